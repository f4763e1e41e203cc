use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::AuthResponse;
use crate::modules::users::model::User;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;

pub struct AuthService;

impl AuthService {
    async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, email, name, role, department_id, created_at, updated_at
               FROM users WHERE LOWER(email) = LOWER($1)"#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, email, name, role, department_id, created_at, updated_at
               FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db, jwt_config))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        email: &str,
    ) -> Result<AuthResponse, AppError> {
        let user = Self::find_by_email(db, email).await?.ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("No account registered for this email"))
        })?;

        let token = create_access_token(user.id, &user.email, user.role, jwt_config)?;

        Ok(AuthResponse { token, user })
    }

    /// Re-issue a token for a still-existing account.
    #[instrument(skip(db, jwt_config))]
    pub async fn refresh(
        db: &PgPool,
        jwt_config: &JwtConfig,
        user_id: Uuid,
    ) -> Result<AuthResponse, AppError> {
        let user = Self::find_by_id(db, user_id).await?.ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Account no longer exists"))
        })?;

        let token = create_access_token(user.id, &user.email, user.role, jwt_config)?;

        Ok(AuthResponse { token, user })
    }

    pub async fn me(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        Self::find_by_id(db, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }
}
