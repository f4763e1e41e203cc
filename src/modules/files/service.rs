use std::path::Path;

use crate::utils::errors::AppError;

/// Evidence and attachment uploads: images plus Word documents.
const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub struct FileService;

impl FileService {
    pub fn is_allowed_mime(content_type: &str) -> bool {
        ALLOWED_MIME_TYPES.contains(&content_type)
    }

    /// Strip path components and anything outside `[A-Za-z0-9._-]` so the
    /// name is safe to join onto the upload directory.
    pub fn sanitize_filename(name: &str) -> String {
        let base = name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(name);

        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let trimmed = cleaned.trim_matches('.');
        if trimmed.is_empty() {
            "file".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Write bytes under `<base>/<subdir>/<file_name>` and return the
    /// path relative to the upload root.
    pub async fn save(
        base: &Path,
        subdir: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        let dir = base.join(subdir);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(file_name), bytes).await?;

        Ok(format!("{}/{}", subdir, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_allow_list() {
        assert!(FileService::is_allowed_mime("image/png"));
        assert!(FileService::is_allowed_mime(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ));
        assert!(!FileService::is_allowed_mime("application/x-sh"));
        assert!(!FileService::is_allowed_mime("text/html"));
    }

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(
            FileService::sanitize_filename("../../etc/passwd"),
            "passwd"
        );
        assert_eq!(
            FileService::sanitize_filename("C:\\docs\\note v2.docx"),
            "note_v2.docx"
        );
        assert_eq!(FileService::sanitize_filename("照片.png"), "__.png");
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(FileService::sanitize_filename(""), "file");
        assert_eq!(FileService::sanitize_filename("..."), "file");
    }
}
