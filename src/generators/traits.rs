//! Traits for generator system standardization.

use super::page::Page;
use super::validation::ValidationErrors;
use super::{GeneratedDocument, GeneratorError};

/// Trait for validating request objects.
pub trait Validator {
    /// Validate every field, collecting all failures.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Trait for document generators.
pub trait Generator<Req> {
    /// Generate a document from the request.
    fn generate(&self, request: &Req) -> Result<GeneratedDocument, GeneratorError>;
}

/// Turns a laid-out page into file bytes.
pub trait RenderEngine: Send + Sync {
    /// Short identifier used in logs and configuration.
    fn name(&self) -> &'static str;

    fn render(&self, page: &Page) -> Result<Vec<u8>, GeneratorError>;
}
