use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "vote_answer")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteAnswer {
    Yes,
    No,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Vote {
    pub id: Uuid,
    pub course_id: Uuid,
    pub instructor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub vote_date: Option<NaiveDate>,
    pub is_closed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// No-class / makeup voting: the vote targets one week of the course and
/// can carry a proposed makeup day.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateVoteDto {
    pub course_id: Uuid,
    #[validate(range(min = 1, max = 52, message = "Week number must be between 1 and 52"))]
    pub week_number: i32,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub makeup_date: Option<NaiveDate>,
    pub makeup_reason: Option<String>,
}

/// Student view of an open vote with their own answer, if any.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct StudentVote {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub title: String,
    pub description: Option<String>,
    pub vote_date: Option<NaiveDate>,
    pub my_response: Option<VoteAnswer>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct RespondDto {
    pub response: VoteAnswer,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct VoteResponseRecord {
    pub vote_id: Uuid,
    pub student_id: Uuid,
    pub response: VoteAnswer,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
