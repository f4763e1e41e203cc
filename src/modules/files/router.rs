use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::upload_file;

/// Routes: POST /
pub fn init_files_router() -> Router<AppState> {
    Router::new().route("/", post(upload_file))
}
