use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::modules::attendance::model::AttendanceSummary;
use crate::modules::users::model::UserRole;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub instructor_id: Uuid,
    pub department_id: Uuid,
    pub semester_id: Uuid,
    pub section: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Course list/detail view with joined display names.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct CourseWithNames {
    pub id: Uuid,
    pub title: String,
    pub section: Option<String>,
    pub instructor_id: Uuid,
    pub instructor_name: Option<String>,
    pub department_id: Uuid,
    pub department_name: String,
    pub semester_id: Uuid,
    pub year: i32,
    pub term: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub course_id: Uuid,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ScheduleDto {
    #[validate(range(min = 0, max = 6, message = "Day of week must be between 0 and 6"))]
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub instructor_id: Uuid,
    pub department_id: Uuid,
    pub semester_id: Uuid,
    pub section: Option<String>,
    #[validate(length(min = 1, message = "At least one schedule entry is required"))]
    #[validate(nested)]
    pub schedules: Vec<ScheduleDto>,
    #[serde(default)]
    pub student_ids: Vec<Uuid>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub instructor_id: Uuid,
    pub department_id: Uuid,
    pub semester_id: Uuid,
    pub section: Option<String>,
    #[validate(length(min = 1, message = "At least one schedule entry is required"))]
    #[validate(nested)]
    pub schedules: Vec<ScheduleDto>,
    #[serde(default)]
    pub student_ids: Vec<Uuid>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct EnrollmentInfo {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
}

/// Effective scoring policy for a course; `is_default` marks the built-in
/// values returned when no row has been stored yet.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct PolicyResponse {
    pub course_id: Uuid,
    pub attendance_weight: i32,
    pub lateness_penalty: i32,
    pub absence_penalty: i32,
    pub description: Option<String>,
    pub is_default: bool,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpsertPolicyDto {
    #[validate(range(min = 0, max = 100, message = "Attendance weight must be 0-100"))]
    pub attendance_weight: i32,
    #[validate(range(min = 0, max = 100, message = "Lateness penalty must be 0-100"))]
    pub lateness_penalty: i32,
    #[validate(range(min = 0, max = 100, message = "Absence penalty must be 0-100"))]
    pub absence_penalty: i32,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams, ToSchema)]
pub struct ScoreParams {
    /// Required for staff callers; students may only query themselves.
    pub student_id: Option<Uuid>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ScoreResponse {
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub summary: AttendanceSummary,
    /// (present + excused) / total, in [0, 1].
    pub attendance_rate: f64,
    /// Weighted score in [0, attendance_weight].
    pub score: f64,
    pub policy: PolicyResponse,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct InstructorCourse {
    pub id: Uuid,
    pub title: String,
    pub section: Option<String>,
    pub semester_id: Uuid,
    pub year: i32,
    pub term: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub student_count: i64,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct StudentCourse {
    pub id: Uuid,
    pub title: String,
    pub section: Option<String>,
    pub instructor_name: Option<String>,
    pub year: i32,
    pub term: i32,
}
