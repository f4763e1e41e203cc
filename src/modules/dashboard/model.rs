use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::sessions::model::AttendanceMethod;

/// One open session on the instructor dashboard, with live check-in counts.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct InstructorOpenSession {
    pub session_id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub week_number: i32,
    pub session_date: NaiveDate,
    pub attendance_method: AttendanceMethod,
    pub total_students: i64,
    pub checked: i64,
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
    pub pending: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct InstructorDashboard {
    pub open_sessions: Vec<InstructorOpenSession>,
}

/// One open session on the student dashboard with the caller's own mark.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct StudentOpenSession {
    pub session_id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub week_number: i32,
    pub session_date: NaiveDate,
    pub attendance_method: AttendanceMethod,
    pub my_status: Option<i16>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct StudentDashboard {
    pub open_sessions: Vec<StudentOpenSession>,
    pub checked: i64,
    pub pending: i64,
}
