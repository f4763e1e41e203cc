use axum::{Json, extract::State};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::modules::dashboard::model::{InstructorDashboard, StudentDashboard};
use crate::modules::dashboard::service::DashboardService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Live view of the instructor's open sessions
#[utoipa::path(
    get,
    path = "/api/dashboard/instructor",
    summary = "Instructor dashboard",
    responses(
        (status = 200, description = "Open sessions with check-in counts", body = InstructorDashboard),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - instructor only")
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
pub async fn get_instructor_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<InstructorDashboard>, AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let dashboard = DashboardService::instructor(&state.db, auth_user.user_id()?).await?;
    Ok(Json(dashboard))
}

/// Open sessions awaiting the student's check-in
#[utoipa::path(
    get,
    path = "/api/dashboard/student",
    summary = "Student dashboard",
    responses(
        (status = 200, description = "Open sessions with own status", body = StudentDashboard),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student only")
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
pub async fn get_student_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StudentDashboard>, AppError> {
    check_role(&auth_user, UserRole::Student)?;
    let dashboard = DashboardService::student(&state.db, auth_user.user_id()?).await?;
    Ok(Json(dashboard))
}
