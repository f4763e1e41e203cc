use serde::Serialize;
use utoipa::ToSchema;

/// Metadata returned after a successful upload. `path` is relative to the
/// upload root and served under `/uploads/`.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct UploadedFile {
    pub path: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}
