use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    get_notifications, get_unread_count, mark_all_notifications_read, mark_notification_read,
};

/// Routes: GET /, GET /unread-count, PATCH /{id}/read, PATCH /read-all
pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_notifications))
        .route("/unread-count", get(get_unread_count))
        .route("/read-all", patch(mark_all_notifications_read))
        .route("/{id}/read", patch(mark_notification_read))
}
