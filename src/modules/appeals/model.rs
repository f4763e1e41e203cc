use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// RESOLVED is only reachable through an attendance correction; the appeal
/// endpoint itself can only reject.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "appeal_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppealStatus {
    Pending,
    Reviewed,
    Resolved,
    Rejected,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Appeal {
    pub id: Uuid,
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub message: String,
    pub status: AppealStatus,
    pub instructor_comment: Option<String>,
    pub resolved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateAppealDto {
    pub session_id: Uuid,
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
}

/// Review-surface view with student and current-attendance context.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct AppealWithContext {
    pub id: Uuid,
    pub session_id: Uuid,
    pub week_number: i32,
    pub session_date: NaiveDate,
    pub course_id: Uuid,
    pub course_title: String,
    pub student_id: Uuid,
    pub student_email: String,
    pub student_name: Option<String>,
    pub message: String,
    pub status: AppealStatus,
    pub instructor_comment: Option<String>,
    /// The attendance status being disputed, if still recorded.
    pub current_status: Option<i16>,
    pub resolved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams, ToSchema)]
pub struct AppealFilterParams {
    pub status: Option<AppealStatus>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct RejectAppealDto {
    /// Only REJECTED is accepted here.
    pub status: AppealStatus,
    pub instructor_comment: Option<String>,
}
