//! Generators module - business logic for turning credential records into documents.
//!
//! A generator validates its request, lays the document out on a [`page::Page`]
//! and hands the page to a [`traits::RenderEngine`]:
//! - `PdfRenderEngine` - writes PDF directly
//! - `TypstRenderEngine` - compiles generated Typst markup with the `typst` CLI

pub mod common;
pub mod engine;
pub mod fonts;
pub mod itax_credentials;
pub mod layout;
pub mod page;
pub mod pdf;
pub mod traits;
pub mod validation;

pub use engine::TypstRenderEngine;
pub use itax_credentials::{Branding, ItaxCredentialsGenerator, NoticeTerms};
pub use pdf::PdfRenderEngine;
pub use traits::{Generator, RenderEngine, Validator};
pub use validation::{ValidationError, ValidationErrors};

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("{0}")]
    Validation(#[source] ValidationErrors),
    #[error("failed to write PDF: {0}")]
    Pdf(#[source] std::io::Error),
    #[error("{0:?} text contains a character the PDF font cannot print")]
    UnsupportedCharacter(page::Section),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Result of a successful document generation.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Suggested download name.
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub generated_on: NaiveDate,
}
