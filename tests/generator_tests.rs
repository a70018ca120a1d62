use std::sync::Arc;

use chrono::NaiveDate;
use itax_credentials_server::credentials::model::CredentialRecord;
use itax_credentials_server::generators::common::today;
use itax_credentials_server::generators::page::{Page, Section};
use itax_credentials_server::generators::{
    Generator, GeneratorError, ItaxCredentialsGenerator, NoticeTerms, RenderEngine,
};

fn jane() -> CredentialRecord {
    CredentialRecord {
        first_name: "Jane".into(),
        kra_pin: "A123".into(),
        kra_password: "pw1".into(),
        email: "jane@x.com".into(),
        email_password: "pw2".into(),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[test]
fn test_generates_pdf_for_today() {
    let generator = ItaxCredentialsGenerator::new();
    let doc = generator.generate(&jane()).unwrap();

    assert_eq!(
        doc.filename,
        format!("Jane_ITax_Credentials_{}.pdf", today().format("%Y-%m-%d"))
    );
    assert_eq!(doc.mime_type, "application/pdf");
    assert!(doc.bytes.starts_with(b"%PDF-"));
    assert!(contains(&doc.bytes, b"%%EOF"));
    for value in ["Jane", "A123", "pw1", "jane@x.com", "pw2"] {
        assert!(contains(&doc.bytes, value.as_bytes()), "missing {value}");
    }
    assert!(contains(&doc.bytes, b"Please add a recovery phone number"));
    assert!(contains(&doc.bytes, b"300/="));
}

#[test]
fn test_generations_are_independent() {
    let generator = ItaxCredentialsGenerator::new();
    let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

    let mut other = jane();
    other.first_name = "Peter".into();
    other.kra_pin = "P999".into();

    let first = generator.generate_on(&jane(), date).unwrap();
    let second = generator.generate_on(&other, date).unwrap();

    assert_eq!(first.filename, "Jane_ITax_Credentials_2026-10-17.pdf");
    assert_eq!(second.filename, "Peter_ITax_Credentials_2026-10-17.pdf");
    assert!(contains(&second.bytes, b"P999"));
    assert!(!contains(&second.bytes, b"A123"));
}

#[test]
fn test_same_record_twice_yields_two_documents() {
    let generator = ItaxCredentialsGenerator::new();
    let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

    let first = generator.generate_on(&jane(), date).unwrap();
    let second = generator.generate_on(&jane(), date).unwrap();

    assert_eq!(first.filename, second.filename);
    assert_eq!(first.bytes, second.bytes);
    assert!(contains(&second.bytes, b"A123"));
}

#[test]
fn test_winansi_punctuation_in_secrets_is_preserved() {
    let mut record = jane();
    record.kra_password = "pa\u{20ac}s\u{2019}1".into();

    let doc = ItaxCredentialsGenerator::new()
        .generate_on(&record, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
        .unwrap();
    assert!(contains(&doc.bytes, b"(pa\x80s\x921)"));
    assert!(!contains(&doc.bytes, b"(pa?s?1)"));
}

#[test]
fn test_unprintable_secret_fails_generation() {
    let mut record = jane();
    record.kra_password = "pw\u{1F511}".into();

    match ItaxCredentialsGenerator::new().generate(&record) {
        Err(GeneratorError::UnsupportedCharacter(section)) => {
            assert_eq!(section, Section::TaxDetails)
        }
        other => panic!("expected unsupported character, got {:?}", other.map(|d| d.filename)),
    }
}

#[test]
fn test_invalid_record_produces_no_document() {
    let mut record = jane();
    record.email = "not-an-email".into();

    match ItaxCredentialsGenerator::new().generate(&record) {
        Err(GeneratorError::Validation(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected validation error, got {:?}", other.map(|d| d.filename)),
    }
}

#[test]
fn test_layout_sections_in_reading_order() {
    let page = ItaxCredentialsGenerator::new()
        .layout(&jane(), NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());

    assert_eq!(
        page.sections(),
        vec![
            Section::Header,
            Section::Title,
            Section::Intro,
            Section::TaxDetails,
            Section::EmailDetails,
            Section::Notice,
            Section::Footer,
        ]
    );
    let footer = page.section_texts(Section::Footer).join(" ");
    assert!(footer.contains("2026 Twoem Online Productions. All rights reserved."));
}

#[test]
fn test_custom_notice_terms_appear_in_layout() {
    let generator = ItaxCredentialsGenerator::new().notice_terms(NoticeTerms {
        retrieval_days: 5,
        retrieval_fee: 450,
    });
    let page = generator.layout(&jane(), NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
    let notice = page.section_texts(Section::Notice).join(" ");
    assert!(notice.contains("5 days"));
    assert!(notice.contains("450/="));
}

struct BrokenEngine;

impl RenderEngine for BrokenEngine {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn render(&self, _page: &Page) -> Result<Vec<u8>, GeneratorError> {
        Err(GeneratorError::Pdf(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }
}

#[test]
fn test_render_failure_is_reported() {
    let generator = ItaxCredentialsGenerator::with_engine(Arc::new(BrokenEngine));
    assert_eq!(generator.engine_name(), "broken");

    let err = generator.generate(&jane()).unwrap_err();
    assert!(matches!(err, GeneratorError::Pdf(_)));
    assert!(err.to_string().contains("disk full"));
}
