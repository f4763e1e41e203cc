use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::files::model::UploadedFile;
use crate::modules::files::service::FileService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Upload a file attachment
#[utoipa::path(
    post,
    path = "/api/files",
    summary = "Upload file",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Stored file metadata", body = UploadedFile),
        (status = 400, description = "Missing file, disallowed type or oversized"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Files",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedFile>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !FileService::is_allowed_mime(&content_type) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "File type '{}' is not allowed",
                content_type
            )));
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read file: {}", e)))?;

        if bytes.len() > state.upload_config.max_bytes {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "File exceeds the {} byte limit",
                state.upload_config.max_bytes
            )));
        }

        let file_name = format!(
            "{}_{}",
            Uuid::new_v4(),
            FileService::sanitize_filename(&original_name)
        );
        let path =
            FileService::save(&state.upload_config.dir, "files", &file_name, &bytes).await?;

        return Ok((
            StatusCode::CREATED,
            Json(UploadedFile {
                path,
                file_name,
                content_type,
                size: bytes.len(),
            }),
        ));
    }

    Err(AppError::bad_request(anyhow::anyhow!(
        "Multipart field 'file' is required"
    )))
}
