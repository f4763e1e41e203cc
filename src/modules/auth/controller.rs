use axum::{Json, extract::State, http::HeaderMap};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::audit::service::AuditService;
use crate::modules::auth::model::{AuthResponse, LoginDto};
use crate::modules::auth::service::AuthService;
use crate::modules::users::model::User;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::net::client_ip;
use crate::validator::ValidatedJson;

/// Log in with a registered email
#[utoipa::path(
    post,
    path = "/api/auth/login",
    summary = "Login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Token and user", body = AuthResponse),
        (status = 401, description = "Unknown email"),
        (status = 422, description = "Invalid email")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login(&state.db, &state.jwt_config, &dto.email).await?;

    AuditService::record(
        &state.db,
        Some(response.user.id),
        "LOGIN",
        "user",
        Some(response.user.id),
        &format!("User {} logged in", response.user.email),
        client_ip(&headers).as_deref(),
    )
    .await;

    Ok(Json(response))
}

/// Re-issue a token from a valid bearer token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    summary = "Refresh token",
    responses(
        (status = 200, description = "Fresh token and user", body = AuthResponse),
        (status = 401, description = "Invalid token or deleted account")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn refresh(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<AuthResponse>, AppError> {
    let response =
        AuthService::refresh(&state.db, &state.jwt_config, auth_user.user_id()?).await?;
    Ok(Json(response))
}

/// Current user profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    summary = "Current user",
    responses(
        (status = 200, description = "Caller's user row", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account deleted since token was issued")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = AuthService::me(&state.db, auth_user.user_id()?).await?;
    Ok(Json(user))
}

/// Stateless logout acknowledgment; clients drop the token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    summary = "Logout",
    responses(
        (status = 200, description = "Acknowledged"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    auth_user: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = auth_user.user_id()?;

    AuditService::record(
        &state.db,
        Some(user_id),
        "LOGOUT",
        "user",
        Some(user_id),
        &format!("User {} logged out", auth_user.email()),
        client_ip(&headers).as_deref(),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}
