use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{get_excuse_templates, get_excuses, review_excuse};

/// Review-side routes. Submission is nested under /sessions in the main
/// router; the student list lives under /student.
/// Routes: GET /, GET /templates, PATCH /{id}
pub fn init_excuses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_excuses))
        .route("/templates", get(get_excuse_templates))
        .route("/{id}", patch(review_excuse))
}
