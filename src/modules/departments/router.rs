use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{
    create_department, delete_department, get_departments, update_department,
};

/// Routes: GET /, POST /, PUT /{id}, DELETE /{id}
pub fn init_departments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_departments).post(create_department))
        .route("/{id}", put(update_department).delete(delete_department))
}
