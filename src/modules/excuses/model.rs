use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "excuse_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExcuseStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct ExcuseRequest {
    pub id: Uuid,
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub reason_code: Option<String>,
    pub reason: String,
    pub file_path: Option<String>,
    pub status: ExcuseStatus,
    pub instructor_comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Review-surface view with session, course and student context.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct ExcuseWithContext {
    pub id: Uuid,
    pub session_id: Uuid,
    pub week_number: i32,
    pub session_date: NaiveDate,
    pub course_id: Uuid,
    pub course_title: String,
    pub student_id: Uuid,
    pub student_email: String,
    pub student_name: Option<String>,
    pub reason_code: Option<String>,
    pub reason: String,
    pub file_path: Option<String>,
    pub status: ExcuseStatus,
    pub instructor_comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams, ToSchema)]
pub struct ExcuseFilterParams {
    pub status: Option<ExcuseStatus>,
    pub course_id: Option<Uuid>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct ReviewExcuseDto {
    /// APPROVED or REJECTED; PENDING is not a valid review outcome.
    pub status: ExcuseStatus,
    pub instructor_comment: Option<String>,
}

/// Parsed multipart payload for a new excuse request.
#[derive(Debug, Clone, Default)]
pub struct NewExcuse {
    pub reason_code: Option<String>,
    pub reason: String,
    pub file_path: Option<String>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ExcuseTemplate {
    pub code: &'static str,
    pub label: &'static str,
}

pub fn reason_templates() -> &'static [ExcuseTemplate] {
    const TEMPLATES: &[ExcuseTemplate] = &[
        ExcuseTemplate {
            code: "ILLNESS",
            label: "Illness or medical appointment",
        },
        ExcuseTemplate {
            code: "FAMILY_EVENT",
            label: "Family event or emergency",
        },
        ExcuseTemplate {
            code: "OFFICIAL_BUSINESS",
            label: "Official university business",
        },
        ExcuseTemplate {
            code: "PERSONAL_EMERGENCY",
            label: "Personal emergency",
        },
        ExcuseTemplate {
            code: "OTHER",
            label: "Other (explain below)",
        },
    ];
    TEMPLATES
}
