use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::User;

/// JWT claims carried by every bearer token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    /// Role name, e.g. "STUDENT".
    pub role: String,
    /// Expiry (unix seconds).
    pub exp: usize,
    /// Issued at (unix seconds).
    pub iat: usize,
}

/// Accounts are provisioned by an admin and hold no credentials; login is by
/// registered institutional email.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
