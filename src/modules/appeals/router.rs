use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{create_appeal, get_appeals, get_my_appeals, reject_appeal};

/// Routes: POST /, GET /, GET /my, PATCH /{id}
pub fn init_appeals_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_appeal).get(get_appeals))
        .route("/my", get(get_my_appeals))
        .route("/{id}", patch(reject_appeal))
}
