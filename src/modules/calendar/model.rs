use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: Option<String>,
    pub is_holiday: bool,
}

/// Upsert payload: posting an existing date replaces its name/flag.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct UpsertHolidayDto {
    pub date: NaiveDate,
    pub name: Option<String>,
    #[serde(default = "default_is_holiday")]
    pub is_holiday: bool,
}

fn default_is_holiday() -> bool {
    true
}

#[derive(Deserialize, Debug, Clone, IntoParams, ToSchema)]
pub struct HolidayRangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct MakeupDay {
    pub id: Uuid,
    pub course_id: Uuid,
    pub week_number: i32,
    pub original_date: Option<NaiveDate>,
    pub makeup_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateMakeupDayDto {
    pub course_id: Uuid,
    #[validate(range(min = 1, max = 52, message = "Week number must be between 1 and 52"))]
    pub week_number: i32,
    pub original_date: Option<NaiveDate>,
    pub makeup_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone, IntoParams, ToSchema)]
pub struct MakeupDayParams {
    pub course_id: Uuid,
}
