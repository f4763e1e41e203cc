use axum::{Router, routing::get};

use crate::modules::sessions::controller::{create_session, get_course_sessions};
use crate::state::AppState;

use super::controller::{
    create_course, delete_course, get_course, get_course_enrollments, get_course_policy,
    get_course_schedules, get_course_score, get_courses, update_course, put_course_policy,
};

/// Course routes, including nested session listing/creation. Mixed access
/// levels, so the role checks live in the handlers.
/// Routes: GET /, POST /, GET/PUT/DELETE /{id}, GET /{id}/schedules,
/// GET /{id}/enrollments, GET/PUT /{id}/policy, GET /{id}/score,
/// GET/POST /{id}/sessions
pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_courses).post(create_course))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{id}/schedules", get(get_course_schedules))
        .route("/{id}/enrollments", get(get_course_enrollments))
        .route("/{id}/policy", get(get_course_policy).put(put_course_policy))
        .route("/{id}/score", get(get_course_score))
        .route("/{id}/sessions", get(get_course_sessions).post(create_session))
}
