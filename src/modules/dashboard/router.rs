use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_instructor_dashboard, get_student_dashboard};

pub fn init_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/instructor", get(get_instructor_dashboard))
        .route("/student", get(get_student_dashboard))
}
