use axum::{Router, routing::patch};

use crate::state::AppState;

use super::controller::correct_attendance;

/// Instructor corrections. Check-in and roster routes live beside the
/// session routes in the main router.
/// Routes: PATCH /{session_id}/{student_id}
pub fn init_attendance_router() -> Router<AppState> {
    Router::new().route("/{session_id}/{student_id}", patch(correct_attendance))
}
