use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::semesters::model::{CreateSemesterDto, Semester, UpdateSemesterDto};
use crate::modules::semesters::service::SemesterService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::net::client_ip;
use crate::validator::ValidatedJson;

/// List semesters
#[utoipa::path(
    get,
    path = "/api/semesters",
    summary = "List semesters",
    responses(
        (status = 200, description = "All semesters", body = [Semester]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
pub async fn get_semesters(State(state): State<AppState>) -> Result<Json<Vec<Semester>>, AppError> {
    let semesters = SemesterService::list(&state.db).await?;
    Ok(Json(semesters))
}

/// Create a semester
#[utoipa::path(
    post,
    path = "/api/semesters",
    summary = "Create semester",
    request_body = CreateSemesterDto,
    responses(
        (status = 201, description = "Semester created", body = Semester),
        (status = 400, description = "Start date not before end date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 409, description = "Duplicate year/term"),
        (status = 422, description = "Invalid input")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_semester(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<CreateSemesterDto>,
) -> Result<(StatusCode, Json<Semester>), AppError> {
    let semester = SemesterService::create(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(semester)))
}

/// Update a semester
#[utoipa::path(
    put,
    path = "/api/semesters/{id}",
    summary = "Update semester",
    params(("id" = Uuid, Path, description = "Semester ID")),
    request_body = UpdateSemesterDto,
    responses(
        (status = 200, description = "Semester updated", body = Semester),
        (status = 400, description = "Start date not before end date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Semester not found"),
        (status = 409, description = "Duplicate year/term")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_semester(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSemesterDto>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::update(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        id,
        dto,
    )
    .await?;

    Ok(Json(semester))
}

/// Delete a semester
#[utoipa::path(
    delete,
    path = "/api/semesters/{id}",
    summary = "Delete semester",
    params(("id" = Uuid, Path, description = "Semester ID")),
    responses(
        (status = 204, description = "Semester deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Semester not found"),
        (status = 409, description = "Still referenced by courses")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_semester(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    SemesterService::delete(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
