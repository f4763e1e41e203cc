use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{create_vote, respond_to_vote};

/// The student vote list lives under /student in the main router.
/// Routes: POST /, POST /{id}/respond
pub fn init_votes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vote))
        .route("/{id}/respond", post(respond_to_vote))
}
