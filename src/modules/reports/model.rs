use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::modules::audit::model::AuditLog;

#[derive(Deserialize, Debug, Clone, IntoParams, ToSchema)]
pub struct AttendanceReportParams {
    pub course_id: Uuid,
    /// Restrict the report to one week
    pub week: Option<i32>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct WeekAttendanceRow {
    pub week_number: i32,
    pub sessions: i64,
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
    pub pending: i64,
    /// (present + excused) / (sessions * enrolled)
    pub attendance_rate: f64,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct AttendanceReport {
    pub course_id: Uuid,
    pub enrolled: i64,
    pub weeks: Vec<WeekAttendanceRow>,
}

#[derive(Deserialize, Debug, Clone, IntoParams, ToSchema)]
pub struct ExcuseReportParams {
    pub course_id: Uuid,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ExcuseReport {
    pub course_id: Uuid,
    pub total: i64,
    pub approved: i64,
    pub rejected: i64,
    pub pending: i64,
    /// approved / reviewed; 0 when nothing has been reviewed
    pub approval_rate: f64,
}

#[derive(Deserialize, Debug, Clone, IntoParams, ToSchema)]
pub struct AbsentRiskParams {
    pub course_id: Uuid,
    /// Number of students to return (default 10)
    pub limit: Option<i64>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct AbsentRiskRow {
    pub student_id: Uuid,
    pub student_name: Option<String>,
    pub absences: i64,
}

#[derive(Deserialize, Debug, Clone, IntoParams, ToSchema)]
pub struct LateRiskParams {
    pub course_id: Uuid,
    /// Only consider sessions on or after this date
    pub from: Option<NaiveDate>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct LateRiskRow {
    pub student_id: Uuid,
    pub student_name: Option<String>,
    /// Longest run of consecutive late marks over date-ordered sessions
    pub late_streak: i32,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct RoleCounts {
    pub admins: i64,
    pub instructors: i64,
    pub students: i64,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct SystemReport {
    pub users: RoleCounts,
    pub courses: i64,
    pub sessions: i64,
    pub attendance_records: i64,
    pub recent_errors: Vec<AuditLog>,
}
