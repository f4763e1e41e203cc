use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::calendar::model::{
    CreateMakeupDayDto, Holiday, HolidayRangeParams, MakeupDay, MakeupDayParams, UpsertHolidayDto,
};
use crate::modules::calendar::service::CalendarService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::net::client_ip;
use crate::validator::ValidatedJson;

/// List holidays, optionally within a date range
#[utoipa::path(
    get,
    path = "/api/holidays",
    summary = "List holidays",
    params(HolidayRangeParams),
    responses(
        (status = 200, description = "Holidays ordered by date", body = [Holiday]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only")
    ),
    tag = "Calendar",
    security(("bearer_auth" = []))
)]
pub async fn get_holidays(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<HolidayRangeParams>,
) -> Result<Json<Vec<Holiday>>, AppError> {
    let holidays = CalendarService::list_holidays(&state.db, params.from, params.to).await?;
    Ok(Json(holidays))
}

/// Create or update a holiday entry
#[utoipa::path(
    post,
    path = "/api/holidays",
    summary = "Upsert holiday",
    request_body = UpsertHolidayDto,
    responses(
        (status = 201, description = "Holiday stored", body = Holiday),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only")
    ),
    tag = "Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn upsert_holiday(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Json(dto): Json<UpsertHolidayDto>,
) -> Result<(StatusCode, Json<Holiday>), AppError> {
    let holiday = CalendarService::upsert_holiday(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(holiday)))
}

/// Makeup days for a course
#[utoipa::path(
    get,
    path = "/api/makeup-days",
    summary = "List makeup days",
    params(MakeupDayParams),
    responses(
        (status = 200, description = "Makeup days ordered by date", body = [MakeupDay]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Calendar",
    security(("bearer_auth" = []))
)]
pub async fn get_makeup_days(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<MakeupDayParams>,
) -> Result<Json<Vec<MakeupDay>>, AppError> {
    let days =
        CalendarService::list_makeup_days(&state.db, auth_user.user_id()?, params.course_id)
            .await?;
    Ok(Json(days))
}

/// Schedule a makeup day for a course week
#[utoipa::path(
    post,
    path = "/api/makeup-days",
    summary = "Create makeup day",
    request_body = CreateMakeupDayDto,
    responses(
        (status = 201, description = "Makeup day created", body = MakeupDay),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_makeup_day(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<CreateMakeupDayDto>,
) -> Result<(StatusCode, Json<MakeupDay>), AppError> {
    let day = CalendarService::create_makeup_day(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(day)))
}

/// Remove a makeup day
#[utoipa::path(
    delete,
    path = "/api/makeup-days/{id}",
    summary = "Delete makeup day",
    params(("id" = Uuid, Path, description = "Makeup day ID")),
    responses(
        (status = 204, description = "Makeup day deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Makeup day not found")
    ),
    tag = "Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_makeup_day(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CalendarService::delete_makeup_day(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
