use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::modules::attendance::model::{
    AttendDto, Attendance, CorrectionDto, MyAttendanceParams, MyAttendanceResponse, RosterResponse,
};
use crate::modules::attendance::service::AttendanceService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::net::client_ip;
use crate::validator::ValidatedJson;

/// Student check-in for an open session
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/attend",
    summary = "Check in",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = AttendDto,
    responses(
        (status = 200, description = "Attendance recorded", body = Attendance),
        (status = 400, description = "Incorrect attendance code"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled or session closed"),
        (status = 404, description = "Session not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn attend_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AttendDto>,
) -> Result<Json<Attendance>, AppError> {
    check_role(&auth_user, UserRole::Student)?;
    let attendance =
        AttendanceService::attend(&state.db, auth_user.user_id()?, id, dto).await?;
    Ok(Json(attendance))
}

/// Student's own per-session record and summary for a course
#[utoipa::path(
    get,
    path = "/api/student/attendance",
    summary = "My attendance",
    params(MyAttendanceParams),
    responses(
        (status = 200, description = "Per-session records with summary", body = MyAttendanceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled in the course")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_my_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<MyAttendanceParams>,
) -> Result<Json<MyAttendanceResponse>, AppError> {
    check_role(&auth_user, UserRole::Student)?;
    let response =
        AttendanceService::my_attendance(&state.db, auth_user.user_id()?, params.course_id)
            .await?;
    Ok(Json(response))
}

/// Roster with per-status stats for one session
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/attendance",
    summary = "Session roster",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Roster and stats", body = RosterResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Session not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_session_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterResponse>, AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let response = AttendanceService::roster(&state.db, auth_user.user_id()?, id).await?;
    Ok(Json(response))
}

/// Correct one student's attendance, optionally resolving an appeal
#[utoipa::path(
    patch,
    path = "/api/attendance/{session_id}/{student_id}",
    summary = "Correct attendance",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    request_body = CorrectionDto,
    responses(
        (status = 200, description = "Attendance updated", body = Attendance),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Session or appeal not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn correct_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path((session_id, student_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<CorrectionDto>,
) -> Result<Json<Attendance>, AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let attendance = AttendanceService::correct(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        session_id,
        student_id,
        dto,
    )
    .await?;

    Ok(Json(attendance))
}
