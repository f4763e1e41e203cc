use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::modules::users::model::UserRole;
use crate::modules::votes::model::{
    CreateVoteDto, RespondDto, StudentVote, Vote, VoteResponseRecord,
};
use crate::modules::votes::service::VoteService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::net::client_ip;
use crate::validator::ValidatedJson;

/// Open a no-class / makeup vote for one week of a course
#[utoipa::path(
    post,
    path = "/api/votes",
    summary = "Create vote",
    request_body = CreateVoteDto,
    responses(
        (status = 201, description = "Vote opened and students notified", body = Vote),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course instructor"),
        (status = 404, description = "Course not found")
    ),
    tag = "Votes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_vote(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<CreateVoteDto>,
) -> Result<(StatusCode, Json<Vote>), AppError> {
    check_role(&auth_user, UserRole::Instructor)?;
    let vote = VoteService::create(
        &state.db,
        auth_user.user_id()?,
        client_ip(&headers).as_deref(),
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(vote)))
}

/// Open votes for the calling student's courses
#[utoipa::path(
    get,
    path = "/api/student/votes",
    summary = "My open votes",
    responses(
        (status = 200, description = "Open votes with own response", body = [StudentVote]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student only")
    ),
    tag = "Votes",
    security(("bearer_auth" = []))
)]
pub async fn get_student_votes(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<StudentVote>>, AppError> {
    let votes = VoteService::student_votes(&state.db, auth_user.user_id()?).await?;
    Ok(Json(votes))
}

/// Answer an open vote
#[utoipa::path(
    post,
    path = "/api/votes/{id}/respond",
    summary = "Respond to vote",
    params(("id" = Uuid, Path, description = "Vote ID")),
    request_body = RespondDto,
    responses(
        (status = 200, description = "Response recorded", body = VoteResponseRecord),
        (status = 400, description = "Response must be YES or NO"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Vote closed or not enrolled"),
        (status = 404, description = "Vote not found")
    ),
    tag = "Votes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn respond_to_vote(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<RespondDto>,
) -> Result<Json<VoteResponseRecord>, AppError> {
    check_role(&auth_user, UserRole::Student)?;
    let record = VoteService::respond(&state.db, auth_user.user_id()?, id, dto).await?;
    Ok(Json(record))
}
