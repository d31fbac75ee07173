//! Upload command implementation

use crate::api::{ApiClient, Document, DocumentMetadata, UploadFile};
use crate::error::{Error, Result};
use crate::progress::with_spinner;
use std::path::PathBuf;
use tracing::info;

/// Upload form fields
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub file: Option<PathBuf>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Comma-separated, e.g. `"tag1, tag2, tag3"`
    pub tags: Option<String>,
}

/// Split a comma-separated tag list, trimming each tag and dropping empties.
pub fn parse_tags(raw: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();
    (!tags.is_empty()).then_some(tags)
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

/// Metadata to send with the upload, `None` when every field is blank
pub fn build_metadata(options: &UploadOptions) -> Option<DocumentMetadata> {
    let metadata = DocumentMetadata {
        title: non_blank(options.title.as_ref()),
        description: non_blank(options.description.as_ref()),
        tags: options.tags.as_deref().and_then(parse_tags),
    };
    (!metadata.is_empty()).then_some(metadata)
}

/// Validate the form and upload the file
pub async fn cmd_upload(client: &ApiClient, options: UploadOptions) -> Result<Document> {
    let path = options
        .file
        .as_ref()
        .ok_or_else(|| Error::Validation("File is required".to_string()))?;
    if !path.is_file() {
        return Err(Error::Validation(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let metadata = build_metadata(&options);
    let file = UploadFile::from_path(path).await?;
    info!("Uploading {} ({} bytes)", file.file_name, file.bytes.len());

    with_spinner(
        "Uploading...",
        client.upload_document(file, metadata.as_ref()),
    )
    .await
    .map_err(|e| Error::operation("Upload failed. Please try again.", e))
}

/// Print the uploaded document
pub fn print_upload_result(document: &Document) {
    println!("✓ Upload successful! Your document is being processed.");
    println!("  ID: {}", document.id);
    println!("  File: {}", document.filename);
    println!("  Status: {}", document.status);
}
