use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{check_any_role, check_role};
use crate::modules::excuses::model::{
    ExcuseFilterParams, ExcuseRequest, ExcuseTemplate, ExcuseWithContext, NewExcuse,
    ReviewExcuseDto, reason_templates,
};
use crate::modules::excuses::service::ExcuseService;
use crate::modules::files::service::FileService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::net::client_ip;

/// Submit an excuse request with optional evidence file
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/excuses",
    summary = "Submit excuse",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Excuse submitted", body = ExcuseRequest),
        (status = 400, description = "Missing reason or oversized file"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Excuse already submitted for this session")
    ),
    tag = "Excuses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn create_excuse(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ExcuseRequest>), AppError> {
    check_role(&auth_user, UserRole::Student)?;
    let student_id = auth_user.user_id()?;

    let mut new = NewExcuse::default();
    let mut evidence: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "reason_code" => {
                new.reason_code = Some(field.text().await.map_err(|e| {
                    AppError::bad_request(anyhow::anyhow!("Invalid reason_code field: {}", e))
                })?);
            }
            "reason" => {
                new.reason = field.text().await.map_err(|e| {
                    AppError::bad_request(anyhow::anyhow!("Invalid reason field: {}", e))
                })?;
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("evidence").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::bad_request(anyhow::anyhow!("Failed to read file: {}", e))
                })?;
                if bytes.len() > state.upload_config.max_bytes {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "File exceeds the {} byte limit",
                        state.upload_config.max_bytes
                    )));
                }
                evidence = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    if new.reason.trim().is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!("reason is required")));
    }

    if let Some((file_name, bytes)) = evidence {
        let stored_name = format!(
            "{}_{}_{}_{}",
            student_id,
            id,
            Utc::now().timestamp(),
            FileService::sanitize_filename(&file_name)
        );
        new.file_path =
            Some(FileService::save(&state.upload_config.dir, "excuses", &stored_name, &bytes).await?);
    }

    let excuse = ExcuseService::create(
        &state.db,
        student_id,
        client_ip(&headers).as_deref(),
        id,
        new,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(excuse)))
}

/// The calling student's own excuse requests
#[utoipa::path(
    get,
    path = "/api/student/excuses",
    summary = "My excuses",
    responses(
        (status = 200, description = "Own requests with session/course info", body = [ExcuseWithContext]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student only")
    ),
    tag = "Excuses",
    security(("bearer_auth" = []))
)]
pub async fn get_my_excuses(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ExcuseWithContext>>, AppError> {
    let excuses = ExcuseService::my_excuses(&state.db, auth_user.user_id()?).await?;
    Ok(Json(excuses))
}

/// Excuse requests across the caller's courses
#[utoipa::path(
    get,
    path = "/api/excuses",
    summary = "List excuses",
    params(ExcuseFilterParams),
    responses(
        (status = 200, description = "Requests for the caller's courses", body = [ExcuseWithContext]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only")
    ),
    tag = "Excuses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_excuses(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ExcuseFilterParams>,
) -> Result<Json<Vec<ExcuseWithContext>>, AppError> {
    check_any_role(&auth_user, &[UserRole::Instructor, UserRole::Admin])?;
    let excuses = ExcuseService::list(&state.db, &auth_user, params).await?;
    Ok(Json(excuses))
}

/// Approve or reject an excuse request
#[utoipa::path(
    patch,
    path = "/api/excuses/{id}",
    summary = "Review excuse",
    params(("id" = Uuid, Path, description = "Excuse request ID")),
    request_body = ReviewExcuseDto,
    responses(
        (status = 200, description = "Request reviewed", body = ExcuseRequest),
        (status = 400, description = "Status must be APPROVED or REJECTED"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Excuse request not found")
    ),
    tag = "Excuses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn review_excuse(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(dto): Json<ReviewExcuseDto>,
) -> Result<Json<ExcuseRequest>, AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let excuse = ExcuseService::review(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        id,
        dto,
    )
    .await?;
    Ok(Json(excuse))
}

/// Static excuse reason templates
#[utoipa::path(
    get,
    path = "/api/excuses/templates",
    summary = "Excuse reason templates",
    responses(
        (status = 200, description = "Reason codes with labels", body = [ExcuseTemplate]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Excuses",
    security(("bearer_auth" = []))
)]
pub async fn get_excuse_templates(
    _auth_user: AuthUser,
) -> Result<Json<&'static [ExcuseTemplate]>, AppError> {
    Ok(Json(reason_templates()))
}
