use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info};

use crate::credentials::delivery;
use crate::credentials::model::{
    CredentialRecord, DeliveryFormat, DocumentQuery, ValidationErrorResponse, ValidationReport,
};
use crate::generators::validation::validate_record;
use crate::generators::{Generator, GeneratorError};
use crate::{AppState, ErrorResponse};

/// Shown to the user for any generation failure.
pub const GENERATION_FAILED_MESSAGE: &str = "Error generating PDF. Please try again.";

#[utoipa::path(
    post,
    path = "/api/credentials/validate",
    tag = "Credentials",
    request_body = CredentialRecord,
    responses(
        (status = 200, description = "Per-field validation result", body = ValidationReport)
    )
)]
pub async fn validate_credentials(item: web::Json<CredentialRecord>) -> impl Responder {
    let errors = validate_record(&item);
    if !errors.is_empty() {
        debug!(
            "Validation rejected fields: {:?}",
            errors.iter().map(|e| e.field.key()).collect::<Vec<_>>()
        );
    }

    HttpResponse::Ok().json(ValidationReport {
        valid: errors.is_empty(),
        errors: errors.to_field_map(),
    })
}

#[utoipa::path(
    post,
    path = "/api/credentials/document",
    tag = "Credentials",
    request_body = CredentialRecord,
    params(DocumentQuery),
    responses(
        (status = 200, description = "PDF attachment, or a FileContent envelope when format=json"),
        (status = 422, description = "One or more fields failed validation", body = ValidationErrorResponse),
        (status = 500, description = "The document could not be generated", body = ErrorResponse)
    )
)]
pub async fn generate_document(
    state: web::Data<AppState>,
    query: web::Query<DocumentQuery>,
    item: web::Json<CredentialRecord>,
) -> impl Responder {
    let record = item.into_inner();

    let errors = validate_record(&record);
    if !errors.is_empty() {
        debug!(
            "Document request rejected, invalid fields: {:?}",
            errors.iter().map(|e| e.field.key()).collect::<Vec<_>>()
        );
        return HttpResponse::UnprocessableEntity().json(ValidationErrorResponse::new(
            errors.summary(),
            errors.to_field_map(),
        ));
    }

    let generator = state.generator.clone();
    let result = web::block(move || generator.generate(&record)).await;

    let doc = match result {
        Ok(Ok(doc)) => doc,
        Ok(Err(GeneratorError::Validation(errors))) => {
            return HttpResponse::UnprocessableEntity().json(ValidationErrorResponse::new(
                errors.summary(),
                errors.to_field_map(),
            ));
        }
        Ok(Err(e)) => {
            error!("Failed to generate credentials document: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(GENERATION_FAILED_MESSAGE));
        }
        Err(e) => {
            error!("Credentials document worker failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(GENERATION_FAILED_MESSAGE));
        }
    };

    info!(
        "Generated {} ({} bytes, {} backend)",
        doc.filename,
        doc.bytes.len(),
        state.generator.engine_name()
    );

    match query.format.unwrap_or_default() {
        DeliveryFormat::Pdf => delivery::attachment(doc),
        DeliveryFormat::Json => delivery::json_envelope(&doc),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/credentials/validate").route(web::post().to(validate_credentials)),
    )
    .service(web::resource("/credentials/document").route(web::post().to(generate_document)));
}
