use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{create_semester, delete_semester, get_semesters, update_semester};

/// Routes: GET /, POST /, PUT /{id}, DELETE /{id}
pub fn init_semesters_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_semesters).post(create_semester))
        .route("/{id}", put(update_semester).delete(delete_semester))
}
