use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::audit::model::{AuditLog, AuditLogFilterParams, AuditLogListResponse};
use crate::utils::errors::AppError;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

pub struct AuditService;

impl AuditService {
    /// Append an audit event. Auditing must never break the request that
    /// triggered it, so failures are logged and swallowed here.
    pub async fn record(
        db: &PgPool,
        user_id: Option<Uuid>,
        action: &str,
        target_type: &str,
        target_id: Option<Uuid>,
        description: &str,
        ip_address: Option<&str>,
    ) {
        let result = sqlx::query(
            r#"INSERT INTO audit_logs (user_id, action, target_type, target_id, description, ip_address)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(user_id)
        .bind(action)
        .bind(target_type)
        .bind(target_id)
        .bind(description)
        .bind(ip_address)
        .execute(db)
        .await;

        if let Err(err) = result {
            tracing::warn!(error = %err, action, target_type, "Failed to record audit event");
        }
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        params: AuditLogFilterParams,
    ) -> Result<AuditLogListResponse, AppError> {
        let limit = params
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = params.offset.unwrap_or(0).max(0);

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM audit_logs
               WHERE ($1::text IS NULL OR action = $1)
                 AND ($2::text IS NULL OR target_type = $2)
                 AND ($3::uuid IS NULL OR target_id = $3)
                 AND ($4::date IS NULL OR created_at::date >= $4)
                 AND ($5::date IS NULL OR created_at::date <= $5)"#,
        )
        .bind(&params.action)
        .bind(&params.target_type)
        .bind(params.target_id)
        .bind(params.from)
        .bind(params.to)
        .fetch_one(db)
        .await?;

        let logs = sqlx::query_as::<_, AuditLog>(
            r#"SELECT id, user_id, action, target_type, target_id, description, ip_address, created_at
               FROM audit_logs
               WHERE ($1::text IS NULL OR action = $1)
                 AND ($2::text IS NULL OR target_type = $2)
                 AND ($3::uuid IS NULL OR target_id = $3)
                 AND ($4::date IS NULL OR created_at::date >= $4)
                 AND ($5::date IS NULL OR created_at::date <= $5)
               ORDER BY created_at DESC
               LIMIT $6 OFFSET $7"#,
        )
        .bind(&params.action)
        .bind(&params.target_type)
        .bind(params.target_id)
        .bind(params.from)
        .bind(params.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(AuditLogListResponse { total, logs })
    }
}
