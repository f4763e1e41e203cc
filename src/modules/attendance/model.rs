use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::modules::sessions::model::AttendanceMethod;

/// Attendance status codes as stored in `attendances.status`.
pub mod status {
    pub const PENDING: i16 = 0;
    pub const PRESENT: i16 = 1;
    pub const LATE: i16 = 2;
    pub const ABSENT: i16 = 3;
    pub const EXCUSED: i16 = 4;

    pub fn is_valid(status: i16) -> bool {
        (PENDING..=EXCUSED).contains(&status)
    }

    pub fn label(status: i16) -> &'static str {
        match status {
            PENDING => "PENDING",
            PRESENT => "PRESENT",
            LATE => "LATE",
            ABSENT => "ABSENT",
            EXCUSED => "EXCUSED",
            _ => "UNKNOWN",
        }
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Attendance {
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub status: i16,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct AttendDto {
    /// Required for AUTH_CODE sessions.
    pub auth_code: Option<String>,
}

#[derive(Deserialize, Debug, Clone, IntoParams, ToSchema)]
pub struct MyAttendanceParams {
    pub course_id: Uuid,
}

/// One session row in a student's own attendance view.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct StudentSessionRecord {
    pub session_id: Uuid,
    pub week_number: i32,
    pub session_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub attendance_method: AttendanceMethod,
    pub is_open: bool,
    pub status: Option<i16>,
    pub checked_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct AttendanceSummary {
    pub total: i64,
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
    pub pending: i64,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct MyAttendanceResponse {
    pub records: Vec<StudentSessionRecord>,
    pub summary: AttendanceSummary,
}

/// One roster row in the instructor's per-session view.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct RosterRecord {
    pub student_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub status: Option<i16>,
    pub checked_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct RosterResponse {
    pub records: Vec<RosterRecord>,
    pub stats: AttendanceSummary,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CorrectionDto {
    /// 0=pending 1=present 2=late 3=absent 4=excused.
    pub status: i16,
    /// When set, the matching appeal is resolved alongside the correction.
    pub appeal_id: Option<Uuid>,
    pub comment: Option<String>,
}
