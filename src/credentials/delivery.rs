//! Handing a generated document to the client.
//!
//! Browsers get the raw bytes as an attachment; hosts that cannot deal with
//! a binary download get a JSON envelope with base64 data.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::HttpResponse;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::generators::GeneratedDocument;

/// Metadata for file content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Suggested filename with extension
    pub filename: String,
    /// MIME type (e.g., "application/pdf")
    pub mime_type: String,
    /// File size in bytes
    pub size_bytes: usize,
    /// Creation timestamp in ISO8601 format
    pub created_at: String,
}

impl FileMetadata {
    /// Create new file metadata with current timestamp.
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, size_bytes: usize) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            size_bytes,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// File content with metadata and base64-encoded data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    pub metadata: FileMetadata,
    /// Base64-encoded file data
    pub data: String,
}

impl FileContent {
    /// Create new file content from raw bytes.
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, data: &[u8]) -> Self {
        let filename = filename.into();
        let mime_type = mime_type.into();
        Self {
            metadata: FileMetadata::new(&filename, &mime_type, data.len()),
            data: BASE64.encode(data),
        }
    }
}

impl From<&GeneratedDocument> for FileContent {
    fn from(doc: &GeneratedDocument) -> Self {
        Self::new(&doc.filename, &doc.mime_type, &doc.bytes)
    }
}

/// `200` with the document as a download.
pub fn attachment(doc: GeneratedDocument) -> HttpResponse {
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(doc.filename.clone())],
    };

    HttpResponse::Ok()
        .content_type(doc.mime_type)
        .insert_header(disposition)
        .insert_header(("Cache-Control", "no-store"))
        .body(doc.bytes)
}

/// `200` with the document wrapped in a [`FileContent`] envelope.
pub fn json_envelope(doc: &GeneratedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(FileContent::from(doc))
}
