//! User entities and DTOs.
//!
//! Accounts are provisioned by administrators; there is no self-signup.
//! Every user carries exactly one [`UserRole`] which drives route-level
//! authorization.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// System role attached to every account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Instructor,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Instructor => "INSTRUCTOR",
            UserRole::Student => "STUDENT",
        }
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserRole::Admin),
            "INSTRUCTOR" => Ok(UserRole::Instructor),
            "STUDENT" => Ok(UserRole::Student),
            _ => Err(()),
        }
    }
}

/// A user row.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub department_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a user.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub department_id: Option<Uuid>,
}

/// DTO for updating a user.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub department_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_string_round_trip() {
        for role in [UserRole::Admin, UserRole::Instructor, UserRole::Student] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("TEACHER".parse::<UserRole>().is_err());
    }
}
