use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::modules::appeals::model::{
    Appeal, AppealFilterParams, AppealWithContext, CreateAppealDto, RejectAppealDto,
};
use crate::modules::appeals::service::AppealService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::net::client_ip;
use crate::validator::ValidatedJson;

/// File an appeal against a recorded attendance status
#[utoipa::path(
    post,
    path = "/api/appeals",
    summary = "Submit appeal",
    request_body = CreateAppealDto,
    responses(
        (status = 201, description = "Appeal filed", body = Appeal),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student only"),
        (status = 404, description = "No attendance record for the session"),
        (status = 409, description = "Pending appeal already exists")
    ),
    tag = "Appeals",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_appeal(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<CreateAppealDto>,
) -> Result<(StatusCode, Json<Appeal>), AppError> {
    check_role(&auth_user, UserRole::Student)?;
    let appeal = AppealService::create(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(appeal)))
}

/// The calling student's own appeals
#[utoipa::path(
    get,
    path = "/api/appeals/my",
    summary = "My appeals",
    responses(
        (status = 200, description = "Own appeals with context", body = [AppealWithContext]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student only")
    ),
    tag = "Appeals",
    security(("bearer_auth" = []))
)]
pub async fn get_my_appeals(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<AppealWithContext>>, AppError> {
    check_role(&auth_user, UserRole::Student)?;
    let appeals = AppealService::my_appeals(&state.db, auth_user.user_id()?).await?;
    Ok(Json(appeals))
}

/// Appeals across the calling instructor's courses
#[utoipa::path(
    get,
    path = "/api/appeals",
    summary = "List appeals",
    params(AppealFilterParams),
    responses(
        (status = 200, description = "Appeals with student and attendance info", body = [AppealWithContext]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - instructor only")
    ),
    tag = "Appeals",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_appeals(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<AppealFilterParams>,
) -> Result<Json<Vec<AppealWithContext>>, AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let appeals = AppealService::list(&state.db, auth_user.user_id()?, params).await?;
    Ok(Json(appeals))
}

/// Reject an appeal
#[utoipa::path(
    patch,
    path = "/api/appeals/{id}",
    summary = "Reject appeal",
    params(("id" = Uuid, Path, description = "Appeal ID")),
    request_body = RejectAppealDto,
    responses(
        (status = 200, description = "Appeal rejected", body = Appeal),
        (status = 400, description = "Status other than REJECTED"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Appeal not found")
    ),
    tag = "Appeals",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn reject_appeal(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(dto): Json<RejectAppealDto>,
) -> Result<Json<Appeal>, AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let appeal = AppealService::reject(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        id,
        dto,
    )
    .await?;
    Ok(Json(appeal))
}
