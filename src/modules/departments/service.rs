use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::audit::service::AuditService;
use crate::modules::departments::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};
use crate::utils::errors::{AppError, conflict_on_reference, conflict_on_unique};

pub struct DepartmentService;

impl DepartmentService {
    pub async fn list(db: &PgPool) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>(
            "SELECT id, name, code, created_at, updated_at FROM departments ORDER BY code",
        )
        .fetch_all(db)
        .await?;

        Ok(departments)
    }

    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"INSERT INTO departments (name, code)
               VALUES ($1, $2)
               RETURNING id, name, code, created_at, updated_at"#,
        )
        .bind(&dto.name)
        .bind(&dto.code)
        .fetch_one(db)
        .await
        .map_err(|e| conflict_on_unique(e, "A department with this code already exists"))?;

        AuditService::record(
            db,
            Some(actor_id),
            "DEPARTMENT_CREATED",
            "department",
            Some(department.id),
            &format!("Created department {} ({})", department.name, department.code),
            ip,
        )
        .await;

        Ok(department)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"UPDATE departments SET name = $2, code = $3, updated_at = now()
               WHERE id = $1
               RETURNING id, name, code, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.code)
        .fetch_optional(db)
        .await
        .map_err(|e| conflict_on_unique(e, "A department with this code already exists"))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Department not found")))?;

        AuditService::record(
            db,
            Some(actor_id),
            "DEPARTMENT_UPDATED",
            "department",
            Some(department.id),
            &format!("Updated department {}", department.code),
            ip,
        )
        .await;

        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn delete(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                conflict_on_reference(e, "Department is still referenced by courses or users")
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Department not found")));
        }

        AuditService::record(
            db,
            Some(actor_id),
            "DEPARTMENT_DELETED",
            "department",
            Some(id),
            "Deleted department",
            ip,
        )
        .await;

        Ok(())
    }
}
