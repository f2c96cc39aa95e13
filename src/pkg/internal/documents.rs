use std::path::Path;

use uuid::Uuid;

use crate::prelude::{ApiError, Result};

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Storage record for one uploaded candidate document.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    /// File name inside the upload directory.
    pub path: String,
    pub original_name: String,
    pub mime: String,
}

impl StoredDocument {
    /// Checks an upload against the policy and picks its storage name,
    /// without touching disk. Callers persist the bytes once the owning
    /// record is in place.
    pub fn plan(original_name: &str, size: usize) -> Result<StoredDocument> {
        let extension = validate_upload(original_name, size)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        Ok(StoredDocument {
            path: file_name,
            original_name: original_name.to_string(),
            mime: mime_for_extension(&extension).to_string(),
        })
    }

    pub async fn persist(&self, dir: &str, data: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(Path::new(dir).join(&self.path), data).await?;
        Ok(())
    }
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Checks the file name and size against the upload policy and returns the
/// normalized extension.
fn validate_upload(file_name: &str, size: usize) -> Result<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ApiError::Validation(
            "invalid file type, only PDF, DOC and DOCX documents are allowed".to_string(),
        ));
    }
    if size > MAX_DOCUMENT_BYTES {
        return Err(ApiError::Validation(
            "file too large, maximum size is 10MB".to_string(),
        ));
    }
    Ok(extension)
}

pub async fn load(dir: &str, file_name: &str) -> Result<Vec<u8>> {
    match tokio::fs::read(Path::new(dir).join(file_name)).await {
        Ok(data) => Ok(data),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ApiError::NotFound(
            format!("document {file_name} is missing from storage"),
        )),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn extensions_map_to_mime_types() {
        assert_eq!(mime_for_extension("pdf"), "application/pdf");
        assert_eq!(mime_for_extension("doc"), "application/msword");
        assert_eq!(mime_for_extension("bin"), "application/octet-stream");
    }

    #[test]
    fn upload_policy_rejects_unknown_extensions() {
        assert!(validate_upload("resume.exe", 100).is_err());
        assert!(validate_upload("resume", 100).is_err());
        assert_eq!(validate_upload("resume.PDF", 100).unwrap(), "pdf");
    }

    #[test]
    fn upload_policy_rejects_oversized_files() {
        assert!(validate_upload("resume.pdf", MAX_DOCUMENT_BYTES + 1).is_err());
        assert!(validate_upload("resume.pdf", MAX_DOCUMENT_BYTES).is_ok());
    }

    #[test]
    fn planning_names_the_file_after_its_extension() {
        let planned = StoredDocument::plan("cv.docx", 512).unwrap();
        assert!(planned.path.ends_with(".docx"));
        assert_eq!(planned.original_name, "cv.docx");
        assert_eq!(
            planned.mime,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert!(StoredDocument::plan("cv.exe", 512).is_err());
    }

    #[tokio::test]
    #[traced_test]
    async fn persisted_documents_can_be_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_str().unwrap();

        let planned = StoredDocument::plan("cv.pdf", 16).unwrap();
        planned
            .persist(dir_path, b"%PDF-1.4 content")
            .await
            .unwrap();

        let data = load(dir_path, &planned.path).await.unwrap();
        assert_eq!(data, b"%PDF-1.4 content");
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_documents_surface_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().to_str().unwrap(), "gone.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
