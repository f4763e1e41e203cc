use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_conversation, get_message_rooms, send_message};

pub fn init_messages_router() -> Router<AppState> {
    Router::new()
        .route("/", post(send_message))
        .route("/rooms", get(get_message_rooms))
        .route("/with/{user_id}", get(get_conversation))
}
