use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// One append-only audit row.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub target_type: String,
    pub target_id: Option<Uuid>,
    pub description: String,
    pub ip_address: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Default, IntoParams, ToSchema)]
pub struct AuditLogFilterParams {
    pub action: Option<String>,
    pub target_type: Option<String>,
    pub target_id: Option<Uuid>,
    /// Inclusive lower bound on the event date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the event date.
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct AuditLogListResponse {
    pub total: i64,
    pub logs: Vec<AuditLog>,
}
