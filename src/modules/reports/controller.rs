use axum::{
    Json,
    extract::{Query, State},
};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::modules::reports::model::{
    AbsentRiskParams, AbsentRiskRow, AttendanceReport, AttendanceReportParams, ExcuseReport,
    ExcuseReportParams, LateRiskParams, LateRiskRow, SystemReport,
};
use crate::modules::reports::service::ReportService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Per-week attendance totals for a course
#[utoipa::path(
    get,
    path = "/api/reports/attendance",
    summary = "Attendance report",
    params(AttendanceReportParams),
    responses(
        (status = 200, description = "Weekly totals and attendance rate", body = AttendanceReport),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
pub async fn get_attendance_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<AttendanceReportParams>,
) -> Result<Json<AttendanceReport>, AppError> {
    let report =
        ReportService::attendance(&state.db, &auth_user, params.course_id, params.week).await?;
    Ok(Json(report))
}

/// Excuse totals and approval rate for a course
#[utoipa::path(
    get,
    path = "/api/reports/excuses",
    summary = "Excuse report",
    params(ExcuseReportParams),
    responses(
        (status = 200, description = "Totals and approval rate", body = ExcuseReport),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
pub async fn get_excuse_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ExcuseReportParams>,
) -> Result<Json<ExcuseReport>, AppError> {
    let report = ReportService::excuses(
        &state.db,
        &auth_user,
        params.course_id,
        params.from,
        params.to,
    )
    .await?;
    Ok(Json(report))
}

/// Students with the most absences
#[utoipa::path(
    get,
    path = "/api/reports/risk/absent",
    summary = "Absence risk report",
    params(AbsentRiskParams),
    responses(
        (status = 200, description = "Top absentees, highest first", body = [AbsentRiskRow]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
pub async fn get_absent_risk_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<AbsentRiskParams>,
) -> Result<Json<Vec<AbsentRiskRow>>, AppError> {
    let rows =
        ReportService::absent_risk(&state.db, &auth_user, params.course_id, params.limit).await?;
    Ok(Json(rows))
}

/// Students with consecutive late marks
#[utoipa::path(
    get,
    path = "/api/reports/risk/late",
    summary = "Lateness risk report",
    params(LateRiskParams),
    responses(
        (status = 200, description = "Students with a late streak of 2 or more", body = [LateRiskRow]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
pub async fn get_late_risk_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<LateRiskParams>,
) -> Result<Json<Vec<LateRiskRow>>, AppError> {
    let rows =
        ReportService::late_risk(&state.db, &auth_user, params.course_id, params.from).await?;
    Ok(Json(rows))
}

/// Whole-system aggregates
#[utoipa::path(
    get,
    path = "/api/reports/system",
    summary = "System report",
    responses(
        (status = 200, description = "User counts, aggregates and recent errors", body = SystemReport),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
pub async fn get_system_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<SystemReport>, AppError> {
    check_role(&auth_user, UserRole::Admin)?;
    let report = ReportService::system(&state.db).await?;
    Ok(Json(report))
}
