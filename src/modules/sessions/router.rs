use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::attendance::controller::{attend_session, get_session_attendance};
use crate::state::AppState;

use super::controller::{
    batch_create_sessions, close_session, get_session, open_session, pause_session,
};

/// Standalone session routes. Role and ownership rules are enforced in the
/// handlers and services, so this router carries no layer of its own.
/// Routes: GET /{id}, POST /batch, POST /{id}/open, POST /{id}/pause,
/// POST /{id}/close, POST /{id}/attend, GET /{id}/attendance
pub fn init_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/batch", post(batch_create_sessions))
        .route("/{id}", get(get_session))
        .route("/{id}/open", post(open_session))
        .route("/{id}/pause", post(pause_session))
        .route("/{id}/close", post(close_session))
        .route("/{id}/attend", post(attend_session))
        .route("/{id}/attendance", get(get_session_attendance))
}
