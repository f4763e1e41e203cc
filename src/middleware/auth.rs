use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::model::Claims;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer token and provides the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The caller's user id.
    pub fn user_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid user ID in token")))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// The caller's role parsed from the token.
    pub fn role(&self) -> Result<UserRole, AppError> {
        self.0
            .role
            .parse()
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid role in token")))
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role(), Ok(UserRole::Admin))
    }

    pub fn is_instructor(&self) -> bool {
        matches!(self.role(), Ok(UserRole::Instructor))
    }

    pub fn is_student(&self) -> bool {
        matches!(self.role(), Ok(UserRole::Student))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims(role: &str) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn role_helpers() {
        assert!(AuthUser(claims("ADMIN")).is_admin());
        assert!(AuthUser(claims("INSTRUCTOR")).is_instructor());
        assert!(AuthUser(claims("STUDENT")).is_student());
        assert!(!AuthUser(claims("STUDENT")).is_admin());
    }

    #[test]
    fn user_id_round_trips() {
        let id = Uuid::new_v4();
        let mut c = claims("STUDENT");
        c.sub = id.to_string();
        assert_eq!(AuthUser(c).user_id().unwrap(), id);
    }

    #[test]
    fn garbage_sub_is_rejected() {
        let mut c = claims("STUDENT");
        c.sub = "not-a-uuid".to_string();
        assert!(AuthUser(c).user_id().is_err());
    }
}
