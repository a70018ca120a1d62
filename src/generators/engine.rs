//! Typst rendering engine.
//!
//! Translates a [`Page`] into Typst markup, writes it to a temporary
//! directory, invokes the compiler, and reads back the output PDF.

use std::fmt::Write as _;
use std::fs;
use std::process::Command;
use tempfile::tempdir;
use tempfile::TempDir;

use super::common::escape_typst_string;
use super::layout::Color;
use super::page::{DrawOp, Page};
use super::traits::RenderEngine;
use super::GeneratorError;

const SOURCE_FILE: &str = "document.typ";
const OUTPUT_FILE: &str = "document.pdf";

/// Engine that shells out to the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: String,
}

impl TypstRenderEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for TypstRenderEngine {
    fn default() -> Self {
        Self::new("typst")
    }
}

impl RenderEngine for TypstRenderEngine {
    fn name(&self) -> &'static str {
        "typst"
    }

    fn render(&self, page: &Page) -> Result<Vec<u8>, GeneratorError> {
        let source = to_typst_source(page);

        // Create temp directory for compilation context
        let temp_dir = tempdir().map_err(GeneratorError::TempDir)?;
        let typ_path = temp_dir.path().join(SOURCE_FILE);
        fs::write(&typ_path, source).map_err(GeneratorError::WriteTypst)?;

        compile_typst_to_pdf(&self.binary, &temp_dir)
    }
}

fn rgb(color: Color) -> String {
    format!("rgb({}, {}, {})", color.0, color.1, color.2)
}

/// Render the page as absolutely placed Typst elements.
///
/// Text edges are set to the baseline so `dy` addresses baselines, matching
/// the page model.
pub fn to_typst_source(page: &Page) -> String {
    let mut src = String::new();
    let _ = writeln!(
        src,
        "#set document(title: \"{}\")",
        escape_typst_string(&page.title)
    );
    let _ = writeln!(
        src,
        "#set page(width: {}mm, height: {}mm, margin: 0pt)",
        page.width, page.height
    );
    let _ = writeln!(
        src,
        "#set text(font: (\"Helvetica\", \"Arial\", \"Liberation Sans\"), top-edge: \"baseline\", bottom-edge: \"baseline\")"
    );

    for placed in &page.ops {
        let element = match &placed.op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                radius,
                fill,
                stroke,
            } => {
                let fill = fill.map(rgb).unwrap_or_else(|| "none".to_string());
                let stroke = stroke
                    .map(|s| format!("{}mm + {}", s.width, rgb(s.color)))
                    .unwrap_or_else(|| "none".to_string());
                format!(
                    "#place(top + left, dx: {x}mm, dy: {y}mm, rect(width: {width}mm, height: {height}mm, radius: {radius}mm, fill: {fill}, stroke: {stroke}))"
                )
            }
            DrawOp::Circle {
                cx,
                cy,
                radius,
                fill,
            } => format!(
                "#place(top + left, dx: {}mm, dy: {}mm, circle(radius: {radius}mm, fill: {}))",
                cx - radius,
                cy - radius,
                rgb(*fill)
            ),
            DrawOp::Text { x, y, text, style } => format!(
                "#place(top + left, dx: {x}mm, dy: {y}mm, text(size: {}pt, weight: \"{}\", fill: {}, \"{}\"))",
                style.size,
                if style.font.is_bold() { "bold" } else { "regular" },
                rgb(style.color),
                escape_typst_string(text)
            ),
        };
        src.push_str(&element);
        src.push('\n');
    }

    src
}

/// Compile the source file inside `temp_dir` to PDF.
fn compile_typst_to_pdf(binary: &str, temp_dir: &TempDir) -> Result<Vec<u8>, GeneratorError> {
    let typ_path = temp_dir.path().join(SOURCE_FILE);
    let output_path = temp_dir.path().join(OUTPUT_FILE);

    let status = Command::new(binary)
        .arg("compile")
        .arg(&typ_path)
        .arg(&output_path)
        .current_dir(temp_dir.path())
        .status()
        .map_err(GeneratorError::TypstIo)?;

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        return Err(GeneratorError::TypstExit(code));
    }

    fs::read(&output_path).map_err(GeneratorError::ReadPdf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::layout::palette;
    use crate::generators::page::{BoxMetrics, PageBuilder, Stroke, TextStyle};

    fn page() -> Page {
        let metrics = BoxMetrics {
            top_offset: 3.0,
            corner_radius: 2.0,
            title_inset: 5.0,
            title_drop: 8.0,
            first_row_drop: 18.0,
            row_gap: 12.0,
            body_drop: 18.0,
            body_inset: 10.0,
        };
        let mut builder = PageBuilder::new(210.0, 297.0, 20.0, metrics).title("Doc");
        builder
            .band(0.0, 50.0, palette::PRIMARY)
            .circle((30.0, 25.0), 12.0, palette::WHITE)
            .rect(
                (20.0, 122.0, 170.0, 35.0),
                2.0,
                Some(palette::TAX_TINT),
                Some(Stroke {
                    color: palette::PRIMARY,
                    width: 0.3,
                }),
            )
            .text((20.0, 90.0), "Hello, \"Jane\"", &TextStyle::bold(12.0, palette::DARK));
        builder.finish()
    }

    #[test]
    fn test_source_page_setup() {
        let src = to_typst_source(&page());
        assert!(src.contains("#set page(width: 210mm, height: 297mm, margin: 0pt)"));
        assert!(src.contains("top-edge: \"baseline\""));
        assert!(src.contains("#set document(title: \"Doc\")"));
    }

    #[test]
    fn test_source_elements() {
        let src = to_typst_source(&page());
        assert!(src.contains("rect(width: 210mm, height: 50mm, radius: 0mm, fill: rgb(41, 98, 255), stroke: none)"));
        assert!(src.contains("dx: 18mm, dy: 13mm, circle(radius: 12mm, fill: rgb(255, 255, 255))"));
        assert!(src.contains("stroke: 0.3mm + rgb(41, 98, 255)"));
        assert!(src.contains("weight: \"bold\""));
        assert!(src.contains(r#""Hello, \"Jane\"""#));
    }

    #[test]
    fn test_missing_binary_is_reported() {
        let engine = TypstRenderEngine::new("definitely-not-a-typst-binary");
        match engine.render(&page()) {
            Err(GeneratorError::TypstIo(_)) => {}
            other => panic!("expected TypstIo error, got {:?}", other.map(|b| b.len())),
        }
    }
}
