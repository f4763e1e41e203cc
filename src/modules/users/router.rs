use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{create_user, delete_user, get_users, update_user};

/// Routes: GET /, POST /, PUT /{id}, DELETE /{id}
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/{id}", put(update_user).delete(delete_user))
}
