use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

use super::controller::{
    create_makeup_day, delete_makeup_day, get_holidays, get_makeup_days, upsert_holiday,
};

/// Nested at /holidays in the main router.
pub fn init_holidays_router() -> Router<AppState> {
    Router::new().route("/", get(get_holidays).post(upsert_holiday))
}

/// Nested at /makeup-days in the main router.
pub fn init_makeup_days_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_makeup_days).post(create_makeup_day))
        .route("/{id}", delete(delete_makeup_day))
}
