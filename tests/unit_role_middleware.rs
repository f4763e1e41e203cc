use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Router, middleware};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use rollcall::config::cors::CorsConfig;
use rollcall::config::jwt::JwtConfig;
use rollcall::config::upload::UploadConfig;
use rollcall::middleware::auth::AuthUser;
use rollcall::middleware::role::{
    check_any_role, check_role, require_admin, require_instructor, require_staff, require_student,
};
use rollcall::modules::auth::model::Claims;
use rollcall::modules::users::model::UserRole;
use rollcall::state::AppState;
use rollcall::utils::jwt::create_access_token;

fn create_test_auth_user(role: &str) -> AuthUser {
    let claims = Claims {
        sub: "00000000-0000-0000-0000-000000000000".to_string(),
        email: "test@example.com".to_string(),
        role: role.to_string(),
        exp: 9999999999,
        iat: 1234567890,
    };
    AuthUser(claims)
}

#[test]
fn test_check_role_exact_match() {
    let auth_user = create_test_auth_user("ADMIN");
    assert!(check_role(&auth_user, UserRole::Admin).is_ok());

    let auth_user = create_test_auth_user("INSTRUCTOR");
    assert!(check_role(&auth_user, UserRole::Instructor).is_ok());

    let auth_user = create_test_auth_user("STUDENT");
    assert!(check_role(&auth_user, UserRole::Student).is_ok());
}

#[test]
fn test_check_role_no_match() {
    let auth_user = create_test_auth_user("STUDENT");
    assert!(check_role(&auth_user, UserRole::Admin).is_err());

    let auth_user = create_test_auth_user("INSTRUCTOR");
    assert!(check_role(&auth_user, UserRole::Admin).is_err());

    let auth_user = create_test_auth_user("ADMIN");
    assert!(check_role(&auth_user, UserRole::Student).is_err());
}

#[test]
fn test_check_role_unknown_role_string() {
    let auth_user = create_test_auth_user("JANITOR");
    assert!(check_role(&auth_user, UserRole::Student).is_err());
}

#[test]
fn test_check_any_role_single_match() {
    let auth_user = create_test_auth_user("ADMIN");
    assert!(check_any_role(&auth_user, &[UserRole::Admin]).is_ok());
}

#[test]
fn test_check_any_role_staff_set() {
    let allowed = [UserRole::Instructor, UserRole::Admin];

    let auth_user = create_test_auth_user("ADMIN");
    assert!(check_any_role(&auth_user, &allowed).is_ok());

    let auth_user = create_test_auth_user("INSTRUCTOR");
    assert!(check_any_role(&auth_user, &allowed).is_ok());

    let auth_user = create_test_auth_user("STUDENT");
    assert!(check_any_role(&auth_user, &allowed).is_err());
}

#[test]
fn test_check_any_role_empty_list() {
    let auth_user = create_test_auth_user("ADMIN");
    assert!(check_any_role(&auth_user, &[]).is_err());
}

#[test]
fn test_user_role_round_trips_through_claims() {
    for (name, role) in [
        ("ADMIN", UserRole::Admin),
        ("INSTRUCTOR", UserRole::Instructor),
        ("STUDENT", UserRole::Student),
    ] {
        let auth_user = create_test_auth_user(name);
        assert_eq!(auth_user.role().unwrap(), role);
    }
}

// The require_* layers only inspect the bearer token, so a lazy pool that
// never connects is enough to exercise them through a real router.
fn test_state() -> AppState {
    AppState {
        db: PgPool::connect_lazy("postgres://localhost/rollcall_test").unwrap(),
        jwt_config: JwtConfig {
            secret: "role-layer-test-secret".to_string(),
            access_token_expiry: 3600,
        },
        cors_config: CorsConfig {
            allowed_origins: vec![],
        },
        upload_config: UploadConfig {
            dir: PathBuf::from("uploads"),
            max_bytes: 1024,
        },
    }
}

fn token_for(role: UserRole, state: &AppState) -> String {
    create_access_token(
        Uuid::new_v4(),
        "layer-test@example.com",
        role,
        &state.jwt_config,
    )
    .unwrap()
}

async fn handler() -> &'static str {
    "ok"
}

async fn request_status(app: Router, token: Option<&str>) -> StatusCode {
    let mut builder = Request::builder().method("GET").uri("/");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn test_require_staff_layer_admits_instructors_and_admins() {
    let state = test_state();
    let app = Router::new()
        .route("/", get(handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff))
        .with_state(state.clone());

    let token = token_for(UserRole::Instructor, &state);
    assert_eq!(
        request_status(app.clone(), Some(&token)).await,
        StatusCode::OK
    );

    let token = token_for(UserRole::Admin, &state);
    assert_eq!(request_status(app, Some(&token)).await, StatusCode::OK);
}

#[tokio::test]
async fn test_require_staff_layer_rejects_students() {
    let state = test_state();
    let app = Router::new()
        .route("/", get(handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff))
        .with_state(state.clone());

    let token = token_for(UserRole::Student, &state);
    assert_eq!(
        request_status(app, Some(&token)).await,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_require_staff_layer_rejects_missing_token() {
    let state = test_state();
    let app = Router::new()
        .route("/", get(handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff))
        .with_state(state);

    assert_eq!(request_status(app, None).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_require_instructor_layer() {
    let state = test_state();
    let app = Router::new()
        .route("/", get(handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_instructor,
        ))
        .with_state(state.clone());

    let token = token_for(UserRole::Instructor, &state);
    assert_eq!(
        request_status(app.clone(), Some(&token)).await,
        StatusCode::OK
    );

    let token = token_for(UserRole::Student, &state);
    assert_eq!(
        request_status(app, Some(&token)).await,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_require_student_layer() {
    let state = test_state();
    let app = Router::new()
        .route("/", get(handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_student,
        ))
        .with_state(state.clone());

    let token = token_for(UserRole::Student, &state);
    assert_eq!(
        request_status(app.clone(), Some(&token)).await,
        StatusCode::OK
    );

    let token = token_for(UserRole::Instructor, &state);
    assert_eq!(
        request_status(app, Some(&token)).await,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_require_admin_layer() {
    let state = test_state();
    let app = Router::new()
        .route("/", get(handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state.clone());

    let token = token_for(UserRole::Admin, &state);
    assert_eq!(
        request_status(app.clone(), Some(&token)).await,
        StatusCode::OK
    );

    let token = token_for(UserRole::Instructor, &state);
    assert_eq!(
        request_status(app, Some(&token)).await,
        StatusCode::FORBIDDEN
    );
}
