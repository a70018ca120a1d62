//! Generator for the I-Tax account credentials sheet.
//!
//! One A4 page handed to the customer after their KRA I-Tax account and
//! email account have been set up: branded header, login details for both
//! accounts, a recovery notice and the shop's address.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::sync::Arc;

use super::common::{credentials_filename, detect_mime_type, today};
use super::layout::{self, body, columns, footer, header, palette, section_box};
use super::page::{BoxMetrics, Callout, LabeledBox, LabeledValue, Page, PageBuilder, Section, Stroke, TextStyle};
use super::pdf::PdfRenderEngine;
use super::traits::{Generator, RenderEngine, Validator};
use super::validation::{validate_record, ValidationErrors};
use super::{GeneratedDocument, GeneratorError};
use crate::credentials::model::CredentialRecord;

pub const DOCUMENT_TITLE: &str = "I-Tax Account Credentials";
pub const INTRO: &str =
    "Your I-Tax account is well created and the following are your login credentials:";
pub const TAX_SECTION_TITLE: &str = "I-Tax Details";
pub const EMAIL_SECTION_TITLE: &str = "Email Details";
pub const NOTICE_TITLE: &str = "Important Notice:";
const PDF_EXTENSION: &str = "pdf";

/// Business terms quoted in the recovery notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeTerms {
    pub retrieval_days: u32,
    /// Fee in Kenyan shillings.
    pub retrieval_fee: u32,
}

impl Default for NoticeTerms {
    fn default() -> Self {
        Self {
            retrieval_days: 3,
            retrieval_fee: 300,
        }
    }
}

impl fmt::Display for NoticeTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Please add a recovery phone number to the email to avoid losing it. \
             Retrieval of an email will take {} days and cost {}/=",
            self.retrieval_days, self.retrieval_fee
        )
    }
}

/// Organization details printed in the header and footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub organization: String,
    pub tagline: String,
    pub address: String,
    /// Single character drawn inside the logo circle.
    pub logo_glyph: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            organization: "Twoem Online Productions".to_string(),
            tagline: "Dealers in: High Speed internet and cyber services".to_string(),
            address: "Kagwe Town, Plaza Building 1st floor next to the Total Petrol Station"
                .to_string(),
            logo_glyph: "T".to_string(),
        }
    }
}

impl Validator for CredentialRecord {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_record(self).into_result()
    }
}

/// Generator for the credentials sheet.
#[derive(Clone)]
pub struct ItaxCredentialsGenerator {
    engine: Arc<dyn RenderEngine>,
    branding: Branding,
    notice: NoticeTerms,
}

impl ItaxCredentialsGenerator {
    /// Create a generator writing PDFs natively with the default branding.
    pub fn new() -> Self {
        Self::with_engine(Arc::new(PdfRenderEngine))
    }

    pub fn with_engine(engine: Arc<dyn RenderEngine>) -> Self {
        Self {
            engine,
            branding: Branding::default(),
            notice: NoticeTerms::default(),
        }
    }

    pub fn notice_terms(mut self, notice: NoticeTerms) -> Self {
        self.notice = notice;
        self
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Lay out the sheet for `record` as generated on `date`.
    pub fn layout(&self, record: &CredentialRecord, date: NaiveDate) -> Page {
        let metrics = BoxMetrics {
            top_offset: section_box::TOP_OFFSET,
            corner_radius: section_box::CORNER_RADIUS,
            title_inset: section_box::TITLE_INSET,
            title_drop: section_box::TITLE_DROP,
            first_row_drop: section_box::FIRST_ROW_DROP,
            row_gap: section_box::ROW_GAP,
            body_drop: section_box::NOTICE_BODY_DROP,
            body_inset: section_box::NOTICE_BODY_INSET,
        };
        let mut page = PageBuilder::new(
            layout::PAGE_WIDTH,
            layout::PAGE_HEIGHT,
            layout::MARGIN,
            metrics,
        )
        .title(DOCUMENT_TITLE);

        self.draw_header(&mut page);

        page.section(Section::Title).move_to(body::TITLE_Y);
        page.line(DOCUMENT_TITLE, &TextStyle::bold(body::TITLE_SIZE, palette::DARK));
        page.advance(body::AFTER_TITLE);
        page.line(
            format!("Hello, {}", record.first_name.trim()),
            &TextStyle::regular(body::GREETING_SIZE, palette::DARK),
        );
        page.advance(body::AFTER_GREETING);

        page.section(Section::Intro);
        let at = (page.margin(), page.cursor());
        let width = page.content_width();
        page.wrapped_paragraph(at, width, INTRO, &TextStyle::regular(body::INTRO_SIZE, palette::MEDIUM));
        page.advance(body::AFTER_INTRO);

        page.section(Section::TaxDetails);
        page.labeled_box(&detail_box(
            TAX_SECTION_TITLE,
            palette::PRIMARY,
            palette::TAX_TINT,
            vec![vec![
                LabeledValue::new("KRA PIN:", columns::LABEL, record.kra_pin.trim(), columns::PIN_VALUE),
                LabeledValue::new(
                    "Password:",
                    columns::PIN_SECRET_LABEL,
                    record.kra_password.as_str(),
                    columns::PIN_SECRET_VALUE,
                ),
            ]],
        ));
        page.advance(section_box::AFTER);

        page.section(Section::EmailDetails);
        page.labeled_box(&detail_box(
            EMAIL_SECTION_TITLE,
            palette::SECONDARY,
            palette::EMAIL_TINT,
            vec![
                vec![LabeledValue::new("Email:", columns::LABEL, record.email.trim(), columns::EMAIL_VALUE)],
                vec![LabeledValue::new(
                    "Password:",
                    columns::LABEL,
                    record.email_password.as_str(),
                    columns::EMAIL_SECRET_VALUE,
                )],
            ],
        ));
        page.advance(section_box::AFTER);

        page.section(Section::Notice);
        page.callout(&Callout {
            title: NOTICE_TITLE.to_string(),
            title_style: TextStyle::bold(section_box::NOTICE_TITLE_SIZE, palette::NOTICE_TITLE),
            body: self.notice.to_string(),
            body_style: TextStyle::regular(section_box::NOTICE_BODY_SIZE, palette::NOTICE_TEXT),
            tint: palette::WARNING_BG,
            border: Stroke {
                color: palette::WARNING,
                width: section_box::NOTICE_BORDER_WIDTH,
            },
            height: section_box::NOTICE_HEIGHT,
        });

        self.draw_footer(&mut page, date);

        page.finish()
    }

    fn draw_header(&self, page: &mut PageBuilder) {
        page.section(Section::Header)
            .band(0.0, header::HEIGHT, palette::PRIMARY)
            .circle(header::LOGO_CENTER, header::LOGO_RADIUS, palette::WHITE)
            .text(
                header::LOGO_GLYPH_AT,
                self.branding.logo_glyph.as_str(),
                &TextStyle::bold(header::LOGO_GLYPH_SIZE, palette::PRIMARY),
            )
            .text(
                header::NAME_AT,
                self.branding.organization.as_str(),
                &TextStyle::bold(header::NAME_SIZE, palette::WHITE),
            )
            .text(
                header::TAGLINE_AT,
                self.branding.tagline.as_str(),
                &TextStyle::regular(header::TAGLINE_SIZE, palette::WHITE),
            );
    }

    fn draw_footer(&self, page: &mut PageBuilder, date: NaiveDate) {
        let top = layout::PAGE_HEIGHT - footer::HEIGHT;
        let left = page.margin();
        page.section(Section::Footer)
            .band(top, footer::HEIGHT, palette::DARK)
            .text(
                (left, top + footer::ADDRESS_DROP),
                self.branding.address.as_str(),
                &TextStyle::regular(footer::ADDRESS_SIZE, palette::WHITE),
            )
            .text(
                (left, top + footer::COPYRIGHT_DROP),
                format!(
                    "\u{00a9} {} {}. All rights reserved.",
                    date.year(),
                    self.branding.organization
                ),
                &TextStyle::regular(footer::COPYRIGHT_SIZE, palette::FOOTER_MUTED),
            );
    }

    /// Validate, lay out and render the sheet as generated on `date`.
    pub fn generate_on(
        &self,
        record: &CredentialRecord,
        date: NaiveDate,
    ) -> Result<GeneratedDocument, GeneratorError> {
        record.validate().map_err(GeneratorError::Validation)?;

        let page = self.layout(record, date);
        let bytes = self.engine.render(&page)?;
        let filename = credentials_filename(&record.first_name, date, PDF_EXTENSION);

        Ok(GeneratedDocument {
            mime_type: detect_mime_type(&filename),
            filename,
            bytes,
            generated_on: date,
        })
    }
}

impl Default for ItaxCredentialsGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn detail_box(
    title: &str,
    accent: layout::Color,
    tint: layout::Color,
    rows: Vec<Vec<LabeledValue>>,
) -> LabeledBox {
    LabeledBox {
        title: title.to_string(),
        title_style: TextStyle::bold(section_box::TITLE_SIZE, accent),
        tint,
        border: Stroke {
            color: accent,
            width: section_box::BORDER_WIDTH,
        },
        height: section_box::HEIGHT,
        label_style: TextStyle::bold(section_box::ROW_SIZE, palette::DARK),
        value_style: TextStyle::regular(section_box::ROW_SIZE, palette::BLACK),
        rows,
    }
}

impl Generator<CredentialRecord> for ItaxCredentialsGenerator {
    /// Generate the sheet dated today.
    fn generate(&self, request: &CredentialRecord) -> Result<GeneratedDocument, GeneratorError> {
        self.generate_on(request, today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::page::DrawOp;

    fn record() -> CredentialRecord {
        CredentialRecord {
            first_name: "Jane".into(),
            kra_pin: "A123".into(),
            kra_password: "pw1".into(),
            email: "jane@x.com".into(),
            email_password: "pw2".into(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn text_y(page: &Page, needle: &str) -> f32 {
        page.ops
            .iter()
            .find_map(|placed| match &placed.op {
                DrawOp::Text { y, text, .. } if text == needle => Some(*y),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_notice_text() {
        assert_eq!(
            NoticeTerms::default().to_string(),
            "Please add a recovery phone number to the email to avoid losing it. \
             Retrieval of an email will take 3 days and cost 300/="
        );
        let custom = NoticeTerms {
            retrieval_days: 5,
            retrieval_fee: 450,
        };
        assert!(custom.to_string().contains("take 5 days and cost 450/="));
    }

    #[test]
    fn test_section_order() {
        let page = ItaxCredentialsGenerator::new().layout(&record(), date());
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
    }

    #[test]
    fn test_baselines_follow_layout_table() {
        let page = ItaxCredentialsGenerator::new().layout(&record(), date());
        assert_eq!(text_y(&page, DOCUMENT_TITLE), 70.0);
        assert_eq!(text_y(&page, "Hello, Jane"), 90.0);
        assert_eq!(text_y(&page, INTRO), 105.0);
        assert_eq!(text_y(&page, "KRA PIN:"), 143.0);
        assert_eq!(text_y(&page, "Email:"), 186.0);
        assert_eq!(text_y(&page, "pw2"), 198.0);
        assert_eq!(text_y(&page, NOTICE_TITLE), 231.0);
        assert_eq!(text_y(&page, "\u{00a9} 2026 Twoem Online Productions. All rights reserved."), 290.0);
    }

    #[test]
    fn test_values_appear_in_their_sections() {
        let page = ItaxCredentialsGenerator::new().layout(&record(), date());
        assert_eq!(
            page.section_texts(Section::TaxDetails),
            vec![TAX_SECTION_TITLE, "KRA PIN:", "A123", "Password:", "pw1"]
        );
        assert_eq!(
            page.section_texts(Section::EmailDetails),
            vec![EMAIL_SECTION_TITLE, "Email:", "jane@x.com", "Password:", "pw2"]
        );
    }

    #[test]
    fn test_notice_is_wrapped_inside_box() {
        let page = ItaxCredentialsGenerator::new().layout(&record(), date());
        let texts = page.section_texts(Section::Notice);
        assert_eq!(texts[0], NOTICE_TITLE);
        assert!(texts.len() > 2);
        assert_eq!(texts[1..].join(" "), NoticeTerms::default().to_string());
    }

    #[test]
    fn test_generate_on_names_file_by_date() {
        let doc = ItaxCredentialsGenerator::new()
            .generate_on(&record(), date())
            .unwrap();
        assert_eq!(doc.filename, "Jane_ITax_Credentials_2026-10-17.pdf");
        assert_eq!(doc.mime_type, "application/pdf");
        assert_eq!(doc.generated_on, date());
        assert!(doc.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_generate_rejects_invalid_record() {
        let mut bad = record();
        bad.email = "jane".into();
        match ItaxCredentialsGenerator::new().generate_on(&bad, date()) {
            Err(GeneratorError::Validation(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {:?}", other.map(|d| d.filename)),
        }
    }
}
