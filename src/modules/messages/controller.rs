use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::messages::model::{ConversationParams, Message, MessageRoom, SendMessageDto};
use crate::modules::messages::service::MessageService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Conversations grouped by peer and course
#[utoipa::path(
    get,
    path = "/api/messages/rooms",
    summary = "List conversations",
    responses(
        (status = 200, description = "Conversations with their last message", body = [MessageRoom]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
pub async fn get_message_rooms(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<MessageRoom>>, AppError> {
    let rooms = MessageService::rooms(&state.db, auth_user.user_id()?).await?;
    Ok(Json(rooms))
}

/// Message thread with one user
#[utoipa::path(
    get,
    path = "/api/messages/with/{user_id}",
    summary = "Get conversation",
    params(
        ("user_id" = Uuid, Path, description = "Peer user ID"),
        ConversationParams
    ),
    responses(
        (status = 200, description = "Messages in chronological order", body = [Message]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(params): Query<ConversationParams>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = MessageService::conversation(
        &state.db,
        auth_user.user_id()?,
        user_id,
        params.course_id,
    )
    .await?;
    Ok(Json(messages))
}

/// Send a message
#[utoipa::path(
    post,
    path = "/api/messages",
    summary = "Send message",
    request_body = SendMessageDto,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Missing receiver or course"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not enrolled or not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn send_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SendMessageDto>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let role = auth_user.role()?;
    let message = MessageService::send(&state.db, auth_user.user_id()?, role, dto).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
