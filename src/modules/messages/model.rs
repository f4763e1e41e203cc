use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub course_id: Option<Uuid>,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One conversation: the peer, the course scope, and the latest message.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct MessageRoom {
    pub peer_id: Uuid,
    pub peer_name: Option<String>,
    pub course_id: Option<Uuid>,
    pub course_title: Option<String>,
    pub last_content: String,
    pub last_sender_id: Uuid,
    pub last_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, IntoParams, ToSchema)]
pub struct ConversationParams {
    /// Restrict the thread to one course
    pub course_id: Option<Uuid>,
}

/// Students omit `receiver_id` and must name a course; the message goes to
/// its instructor. Instructors name the receiver directly.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct SendMessageDto {
    pub receiver_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}
