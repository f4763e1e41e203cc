use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::modules::audit::service::AuditService;
use crate::modules::sessions::model::{
    BatchSessionsDto, BatchSessionsResponse, ClassSession, CreateSessionDto, SessionWithCourse,
};
use crate::modules::sessions::service::SessionService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::net::client_ip;
use crate::validator::ValidatedJson;

/// List a course's sessions ordered by week and date
#[utoipa::path(
    get,
    path = "/api/courses/{id}/sessions",
    summary = "List course sessions",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Sessions ordered by week, date", body = [ClassSession]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
pub async fn get_course_sessions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ClassSession>>, AppError> {
    let sessions = SessionService::list_for_course(&state.db, id).await?;
    Ok(Json(sessions))
}

/// Fetch one session with its course title
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    summary = "Get session",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session detail", body = SessionWithCourse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
pub async fn get_session(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionWithCourse>, AppError> {
    let session = SessionService::get(&state.db, id).await?;
    Ok(Json(session))
}

/// Create a single session for a course
#[utoipa::path(
    post,
    path = "/api/courses/{id}/sessions",
    summary = "Create session",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = CreateSessionDto,
    responses(
        (status = 201, description = "Session created", body = ClassSession),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Invalid input")
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateSessionDto>,
) -> Result<(StatusCode, Json<ClassSession>), AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let session = SessionService::create(&state.db, auth_user.user_id()?, id, dto).await?;

    AuditService::record(
        &state.db,
        Some(auth_user.user_id()?),
        "SESSION_CREATED",
        "class_session",
        Some(session.id),
        &format!(
            "Created week {} session on {}",
            session.week_number, session.session_date
        ),
        client_ip(&headers).as_deref(),
    )
    .await;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Generate weekly sessions over a date range
#[utoipa::path(
    post,
    path = "/api/sessions/batch",
    summary = "Batch-create weekly sessions",
    request_body = BatchSessionsDto,
    responses(
        (status = 201, description = "Created sessions and skipped holidays", body = BatchSessionsResponse),
        (status = 400, description = "No matching weekday in range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn batch_create_sessions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<BatchSessionsDto>,
) -> Result<(StatusCode, Json<BatchSessionsResponse>), AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let course_id = dto.course_id;
    let response = SessionService::batch(&state.db, auth_user.user_id()?, dto).await?;

    AuditService::record(
        &state.db,
        Some(auth_user.user_id()?),
        "SESSIONS_BATCH_CREATED",
        "course",
        Some(course_id),
        &format!(
            "Batch-created {} sessions ({} holidays skipped)",
            response.created.len(),
            response.skipped_holidays.len()
        ),
        client_ip(&headers).as_deref(),
    )
    .await;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Open check-in for a session
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/open",
    summary = "Open session",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session opened", body = SessionWithCourse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn open_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionWithCourse>, AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let session = SessionService::open(&state.db, auth_user.user_id()?, id).await?;
    Ok(Json(session))
}

/// Pause check-in without notifying students
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/pause",
    summary = "Pause session",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session paused", body = SessionWithCourse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn pause_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionWithCourse>, AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let session = SessionService::pause(&state.db, auth_user.user_id()?, id).await?;
    Ok(Json(session))
}

/// Close check-in and notify the class
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/close",
    summary = "Close session",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session closed", body = SessionWithCourse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn close_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionWithCourse>, AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let session = SessionService::close(&state.db, auth_user.user_id()?, id).await?;
    Ok(Json(session))
}
