use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Semester {
    pub id: Uuid,
    pub year: i32,
    pub term: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateSemesterDto {
    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i32,
    #[validate(range(min = 1, max = 4, message = "Term must be between 1 and 4"))]
    pub term: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateSemesterDto {
    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i32,
    #[validate(range(min = 1, max = 4, message = "Term must be between 1 and 4"))]
    pub term: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
