use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{check_any_role, check_role};
use crate::modules::courses::model::{
    Course, CourseWithNames, CreateCourseDto, EnrollmentInfo, InstructorCourse, PolicyResponse,
    ScheduleEntry, ScoreParams, ScoreResponse, StudentCourse, UpdateCourseDto, UpsertPolicyDto,
};
use crate::modules::courses::service::CourseService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::net::client_ip;
use crate::validator::ValidatedJson;

/// List courses with instructor, department and semester names
#[utoipa::path(
    get,
    path = "/api/courses",
    summary = "List courses",
    responses(
        (status = 200, description = "All courses", body = [CourseWithNames]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn get_courses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<CourseWithNames>>, AppError> {
    let courses = CourseService::list(&state.db).await?;
    Ok(Json(courses))
}

/// Fetch one course
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    summary = "Get course",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course detail", body = CourseWithNames),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn get_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseWithNames>, AppError> {
    let course = CourseService::get(&state.db, id).await?;
    Ok(Json(course))
}

/// Weekly schedule entries for a course
#[utoipa::path(
    get,
    path = "/api/courses/{id}/schedules",
    summary = "Course schedules",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Schedule entries", body = [ScheduleEntry]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn get_course_schedules(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ScheduleEntry>>, AppError> {
    let schedules = CourseService::schedules(&state.db, id).await?;
    Ok(Json(schedules))
}

/// Enrolled users for a course
#[utoipa::path(
    get,
    path = "/api/courses/{id}/enrollments",
    summary = "Course enrollments",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled users", body = [EnrollmentInfo]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn get_course_enrollments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<EnrollmentInfo>>, AppError> {
    let enrollments = CourseService::enrollments(&state.db, id).await?;
    Ok(Json(enrollments))
}

/// Create a course with schedules and initial enrollments
#[utoipa::path(
    post,
    path = "/api/courses",
    summary = "Create course",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created; sessions auto-generated", body = Course),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 422, description = "Invalid input")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    check_role(&auth_user, UserRole::Admin)?;

    let course = CourseService::create(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(course)))
}

/// Update a course, replacing schedules and student enrollments
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    summary = "Update course",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    check_role(&auth_user, UserRole::Admin)?;

    let course = CourseService::update(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        id,
        dto,
    )
    .await?;

    Ok(Json(course))
}

/// Delete a course and all dependent records
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    summary = "Delete course",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    check_role(&auth_user, UserRole::Admin)?;

    CourseService::delete(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Effective scoring policy for a course
#[utoipa::path(
    get,
    path = "/api/courses/{id}/policy",
    summary = "Get course policy",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Stored or default policy", body = PolicyResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn get_course_policy(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PolicyResponse>, AppError> {
    check_any_role(&auth_user, &[UserRole::Instructor, UserRole::Admin])?;
    let policy = CourseService::get_policy(&state.db, &auth_user, id).await?;
    Ok(Json(policy))
}

/// Store the scoring policy for a course
#[utoipa::path(
    put,
    path = "/api/courses/{id}/policy",
    summary = "Upsert course policy",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpsertPolicyDto,
    responses(
        (status = 200, description = "Policy stored", body = PolicyResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found"),
        (status = 422, description = "Invalid input")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn put_course_policy(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpsertPolicyDto>,
) -> Result<Json<PolicyResponse>, AppError> {
    check_any_role(&auth_user, &[UserRole::Instructor, UserRole::Admin])?;
    let policy = CourseService::upsert_policy(
        &state.db,
        &auth_user,
        client_ip(&headers).as_deref(),
        id,
        dto,
    )
    .await?;
    Ok(Json(policy))
}

/// Attendance score for a student in a course
#[utoipa::path(
    get,
    path = "/api/courses/{id}/score",
    summary = "Attendance score",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ScoreParams
    ),
    responses(
        (status = 200, description = "Score breakdown", body = ScoreResponse),
        (status = 400, description = "Missing student_id for staff caller"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students may only view their own score"),
        (status = 404, description = "Student not enrolled")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_course_score(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<ScoreParams>,
) -> Result<Json<ScoreResponse>, AppError> {
    let score = CourseService::score(&state.db, &auth_user, id, params.student_id).await?;
    Ok(Json(score))
}

/// Courses the calling instructor teaches
#[utoipa::path(
    get,
    path = "/api/instructor/courses",
    summary = "My courses (instructor)",
    responses(
        (status = 200, description = "Courses with semester range and headcount", body = [InstructorCourse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - instructor only")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn get_instructor_courses(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<InstructorCourse>>, AppError> {
    let courses = CourseService::instructor_courses(&state.db, auth_user.user_id()?).await?;
    Ok(Json(courses))
}

/// Courses the calling student is enrolled in
#[utoipa::path(
    get,
    path = "/api/student/courses",
    summary = "My courses (student)",
    responses(
        (status = 200, description = "Enrolled courses", body = [StudentCourse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student only")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn get_student_courses(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<StudentCourse>>, AppError> {
    let courses = CourseService::student_courses(&state.db, auth_user.user_id()?).await?;
    Ok(Json(courses))
}
