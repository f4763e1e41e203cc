use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::{require_admin, require_instructor, require_staff, require_student};
use crate::modules::appeals::router::init_appeals_router;
use crate::modules::attendance::controller::get_my_attendance;
use crate::modules::attendance::router::init_attendance_router;
use crate::modules::audit::router::init_audit_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::calendar::router::{init_holidays_router, init_makeup_days_router};
use crate::modules::courses::controller::{get_instructor_courses, get_student_courses};
use crate::modules::courses::router::init_courses_router;
use crate::modules::dashboard::router::init_dashboard_router;
use crate::modules::departments::router::init_departments_router;
use crate::modules::excuses::controller::{create_excuse, get_my_excuses};
use crate::modules::excuses::router::init_excuses_router;
use crate::modules::files::router::init_files_router;
use crate::modules::messages::router::init_messages_router;
use crate::modules::notifications::router::init_notifications_router;
use crate::modules::reports::router::init_reports_router;
use crate::modules::semesters::router::init_semesters_router;
use crate::modules::sessions::router::init_sessions_router;
use crate::modules::users::router::init_users_router;
use crate::modules::votes::controller::get_student_votes;
use crate::modules::votes::router::init_votes_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest(
                    "/users",
                    init_users_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest(
                    "/departments",
                    init_departments_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest(
                    "/semesters",
                    init_semesters_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest(
                    "/audit-logs",
                    init_audit_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest("/courses", init_courses_router())
                .nest(
                    "/sessions",
                    init_sessions_router().route("/{id}/excuses", post(create_excuse)),
                )
                .nest("/attendance", init_attendance_router())
                .nest("/excuses", init_excuses_router())
                .nest("/appeals", init_appeals_router())
                .nest("/votes", init_votes_router())
                .nest("/notifications", init_notifications_router())
                .nest("/messages", init_messages_router())
                .nest(
                    "/holidays",
                    init_holidays_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff)),
                )
                .nest(
                    "/makeup-days",
                    init_makeup_days_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_instructor,
                    )),
                )
                .nest("/dashboard", init_dashboard_router())
                .nest(
                    "/reports",
                    init_reports_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff)),
                )
                .nest("/files", init_files_router())
                .nest(
                    "/instructor",
                    Router::new()
                        .route("/courses", get(get_instructor_courses))
                        .route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_instructor,
                        )),
                )
                .nest(
                    "/student",
                    Router::new()
                        .route("/attendance", get(get_my_attendance))
                        .route("/courses", get(get_student_courses))
                        .route("/excuses", get(get_my_excuses))
                        .route("/votes", get(get_student_votes))
                        .route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_student,
                        )),
                ),
        )
        .nest_service("/uploads", ServeDir::new(&state.upload_config.dir))
        .route("/health", get(health))
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
}

async fn health() -> &'static str {
    "ok"
}
