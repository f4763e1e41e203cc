use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::audit::service::AuditService;
use crate::modules::users::model::{CreateUserDto, UpdateUserDto, User};
use crate::utils::errors::{AppError, conflict_on_unique};

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"SELECT id, email, name, role, department_id, created_at, updated_at
               FROM users ORDER BY created_at DESC"#,
        )
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        dto: CreateUserDto,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (email, name, role, department_id)
               VALUES ($1, $2, $3, $4)
               RETURNING id, email, name, role, department_id, created_at, updated_at"#,
        )
        .bind(&dto.email)
        .bind(&dto.name)
        .bind(dto.role)
        .bind(dto.department_id)
        .fetch_one(db)
        .await
        .map_err(|e| conflict_on_unique(e, "A user with this email already exists"))?;

        AuditService::record(
            db,
            Some(actor_id),
            "USER_CREATED",
            "user",
            Some(user.id),
            &format!("Created {} account for {}", user.role.as_str(), user.email),
            ip,
        )
        .await;

        Ok(user)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET email = $2, name = $3, role = $4, department_id = $5, updated_at = now()
               WHERE id = $1
               RETURNING id, email, name, role, department_id, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&dto.email)
        .bind(&dto.name)
        .bind(dto.role)
        .bind(dto.department_id)
        .fetch_optional(db)
        .await
        .map_err(|e| conflict_on_unique(e, "A user with this email already exists"))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        AuditService::record(
            db,
            Some(actor_id),
            "USER_UPDATED",
            "user",
            Some(user.id),
            &format!("Updated account {}", user.email),
            ip,
        )
        .await;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn delete(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        }

        AuditService::record(
            db,
            Some(actor_id),
            "USER_DELETED",
            "user",
            Some(id),
            "Deleted user account",
            ip,
        )
        .await;

        Ok(())
    }
}
