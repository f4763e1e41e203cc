use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// How attendance is collected for a class session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "attendance_method")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceMethod {
    /// Students check in themselves; late after a grace period.
    Electronic,
    /// Students check in with a 4-digit code announced in class.
    AuthCode,
    /// The instructor calls the roll; students are present by default.
    RollCall,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct ClassSession {
    pub id: Uuid,
    pub course_id: Uuid,
    pub week_number: i32,
    pub session_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub attendance_method: AttendanceMethod,
    pub auth_code: Option<String>,
    pub is_open: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct SessionWithCourse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub week_number: i32,
    pub session_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub attendance_method: AttendanceMethod,
    pub auth_code: Option<String>,
    pub is_open: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateSessionDto {
    #[validate(range(min = 1, max = 52, message = "Week number must be between 1 and 52"))]
    pub week_number: i32,
    pub session_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub attendance_method: AttendanceMethod,
}

/// Per-week attendance-method override for batch generation.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct WeekMethodOverride {
    pub week_number: i32,
    pub attendance_method: AttendanceMethod,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct BatchSessionsDto {
    pub course_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday.
    #[validate(range(min = 0, max = 6, message = "Day of week must be between 0 and 6"))]
    pub day_of_week: i16,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub method_overrides: Vec<WeekMethodOverride>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct BatchSessionsResponse {
    pub created: Vec<ClassSession>,
    pub skipped_holidays: Vec<NaiveDate>,
}
