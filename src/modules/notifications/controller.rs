use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::notifications::model::{
    Notification, NotificationFilterParams, ReadAllResponse, UnreadCountResponse,
};
use crate::modules::notifications::service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    summary = "List notifications",
    params(NotificationFilterParams),
    responses(
        (status = 200, description = "Notifications for the caller", body = [Notification]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_notifications(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<NotificationFilterParams>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications =
        NotificationService::list(&state.db, auth_user.user_id()?, params.is_read).await?;
    Ok(Json(notifications))
}

/// Count of unread notifications
#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    summary = "Unread notification count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_unread_count(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let count = NotificationService::unread_count(&state.db, auth_user.user_id()?).await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// Mark one notification as read
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    summary = "Mark notification read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    NotificationService::mark_read(&state.db, auth_user.user_id()?, id).await?;
    Ok(Json(serde_json::json!({ "message": "Notification marked as read" })))
}

/// Mark every unread notification as read
#[utoipa::path(
    patch,
    path = "/api/notifications/read-all",
    summary = "Mark all notifications read",
    responses(
        (status = 200, description = "Number of notifications updated", body = ReadAllResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ReadAllResponse>, AppError> {
    let updated = NotificationService::mark_all_read(&state.db, auth_user.user_id()?).await?;
    Ok(Json(ReadAllResponse { updated }))
}
