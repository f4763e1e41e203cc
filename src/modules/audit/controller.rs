use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use crate::modules::audit::model::{AuditLogFilterParams, AuditLogListResponse};
use crate::modules::audit::service::AuditService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// List audit events, newest first
#[utoipa::path(
    get,
    path = "/api/audit-logs",
    summary = "List audit logs",
    params(AuditLogFilterParams),
    responses(
        (status = 200, description = "Filtered audit events", body = AuditLogListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Audit",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_audit_logs(
    State(state): State<AppState>,
    Query(params): Query<AuditLogFilterParams>,
) -> Result<Json<AuditLogListResponse>, AppError> {
    let response = AuditService::list(&state.db, params).await?;
    Ok(Json(response))
}
