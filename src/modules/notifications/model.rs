use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Well-known notification kinds emitted by the service layer.
pub mod kinds {
    pub const ATTENDANCE_OPENED: &str = "ATTENDANCE_OPENED";
    pub const ATTENDANCE_CLOSED: &str = "ATTENDANCE_CLOSED";
    pub const ATTENDANCE_CORRECTED: &str = "ATTENDANCE_CORRECTED";
    pub const ABSENCE_WARNING: &str = "ABSENCE_WARNING";
    pub const EXCUSE_PENDING: &str = "EXCUSE_PENDING";
    pub const EXCUSE_RESULT: &str = "EXCUSE_RESULT";
    pub const APPEAL_RECEIVED: &str = "APPEAL_RECEIVED";
    pub const APPEAL_ACTION_NEEDED: &str = "APPEAL_ACTION_NEEDED";
    pub const APPEAL_RESULT: &str = "APPEAL_RESULT";
    pub const VOTE_CREATED: &str = "VOTE_CREATED";
    pub const MESSAGE: &str = "MESSAGE";
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Option<Uuid>,
    pub kind: String,
    pub title: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams, ToSchema)]
pub struct NotificationFilterParams {
    pub is_read: Option<bool>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ReadAllResponse {
    pub updated: u64,
}
