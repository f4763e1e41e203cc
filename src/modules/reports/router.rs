use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    get_absent_risk_report, get_attendance_report, get_excuse_report, get_late_risk_report,
    get_system_report,
};

pub fn init_reports_router() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(get_attendance_report))
        .route("/excuses", get(get_excuse_report))
        .route("/risk/absent", get(get_absent_risk_report))
        .route("/risk/late", get(get_late_risk_report))
        .route("/system", get(get_system_report))
}
