//! Native PDF writer.
//!
//! Serializes a [`Page`] into a single-page PDF 1.4 file using the standard
//! Helvetica fonts with WinAnsi encoding. The content stream is left
//! uncompressed.

use std::io::{self, Write};

use super::fonts::Font;
use super::layout::{Color, PT_TO_MM};
use super::page::{DrawOp, Page, Stroke};
use super::traits::RenderEngine;
use super::GeneratorError;

/// Bezier control point distance for quarter circles.
const KAPPA: f32 = 0.552_284_8;

const PRODUCER: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Stateless engine writing PDF bytes directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfRenderEngine;

impl RenderEngine for PdfRenderEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    fn render(&self, page: &Page) -> Result<Vec<u8>, GeneratorError> {
        ensure_encodable(page)?;
        write_pdf(page).map_err(GeneratorError::Pdf)
    }
}

fn mm(value: f32) -> f32 {
    value / PT_TO_MM
}

/// Unicode code points occupying WinAnsi bytes 0x80-0x9F.
#[rustfmt::skip]
const WINANSI_HIGH: [(char, u8); 27] = [
    ('\u{20ac}', 0x80), ('\u{201a}', 0x82), ('\u{0192}', 0x83), ('\u{201e}', 0x84),
    ('\u{2026}', 0x85), ('\u{2020}', 0x86), ('\u{2021}', 0x87), ('\u{02c6}', 0x88),
    ('\u{2030}', 0x89), ('\u{0160}', 0x8a), ('\u{2039}', 0x8b), ('\u{0152}', 0x8c),
    ('\u{017d}', 0x8e), ('\u{2018}', 0x91), ('\u{2019}', 0x92), ('\u{201c}', 0x93),
    ('\u{201d}', 0x94), ('\u{2022}', 0x95), ('\u{2013}', 0x96), ('\u{2014}', 0x97),
    ('\u{02dc}', 0x98), ('\u{2122}', 0x99), ('\u{0161}', 0x9a), ('\u{203a}', 0x9b),
    ('\u{0153}', 0x9c), ('\u{017e}', 0x9e), ('\u{0178}', 0x9f),
];

/// WinAnsi byte for `ch`, if the encoding has a glyph for it.
pub fn winansi_byte(ch: char) -> Option<u8> {
    match u32::from(ch) {
        code @ (0x20..=0x7e | 0xa0..=0xff) => Some(code as u8),
        _ => WINANSI_HIGH
            .iter()
            .find(|(candidate, _)| *candidate == ch)
            .map(|(_, byte)| *byte),
    }
}

/// Escape a string for a PDF literal, mapping it to WinAnsi bytes.
///
/// Characters without a WinAnsi glyph become `?`; callers printing user
/// data check [`ensure_encodable`] first.
pub fn pdf_literal(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for ch in text.chars() {
        let byte = winansi_byte(ch).unwrap_or(b'?');
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
    out
}

/// Refuse pages whose text would not print as entered.
pub fn ensure_encodable(page: &Page) -> Result<(), GeneratorError> {
    for placed in &page.ops {
        if let DrawOp::Text { text, .. } = &placed.op {
            if text.chars().any(|ch| winansi_byte(ch).is_none()) {
                return Err(GeneratorError::UnsupportedCharacter(placed.section));
            }
        }
    }
    Ok(())
}

struct ContentStream<'a> {
    out: Vec<u8>,
    page_height: f32,
    page: &'a Page,
}

impl<'a> ContentStream<'a> {
    fn new(page: &'a Page) -> Self {
        Self {
            out: Vec::new(),
            page_height: page.height,
            page,
        }
    }

    /// Convert a top-left millimetre point into PDF user space.
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (mm(x), mm(self.page_height - y))
    }

    fn fill_color(&mut self, color: Color) -> io::Result<()> {
        let (r, g, b) = color.unit();
        writeln!(self.out, "{:.3} {:.3} {:.3} rg", r, g, b)
    }

    fn stroke_style(&mut self, stroke: Stroke) -> io::Result<()> {
        let (r, g, b) = stroke.color.unit();
        writeln!(self.out, "{:.3} {:.3} {:.3} RG", r, g, b)?;
        writeln!(self.out, "{:.2} w", mm(stroke.width))
    }

    fn paint(&mut self, fill: Option<Color>, stroke: Option<Stroke>) -> io::Result<()> {
        let op = match (fill.is_some(), stroke.is_some()) {
            (true, true) => "B",
            (true, false) => "f",
            (false, true) => "S",
            (false, false) => "n",
        };
        writeln!(self.out, "{op}")
    }

    fn curve(&mut self, c1: (f32, f32), c2: (f32, f32), end: (f32, f32)) -> io::Result<()> {
        writeln!(
            self.out,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            c1.0, c1.1, c2.0, c2.1, end.0, end.1
        )
    }

    fn rounded_rect_path(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) -> io::Result<()> {
        let (left, top) = self.point(x, y);
        let (right, bottom) = self.point(x + w, y + h);
        let r = mm(r).min((right - left) / 2.0).min((top - bottom) / 2.0);
        let k = r * KAPPA;

        writeln!(self.out, "{:.2} {:.2} m", left + r, bottom)?;
        writeln!(self.out, "{:.2} {:.2} l", right - r, bottom)?;
        self.curve((right - r + k, bottom), (right, bottom + r - k), (right, bottom + r))?;
        writeln!(self.out, "{:.2} {:.2} l", right, top - r)?;
        self.curve((right, top - r + k), (right - r + k, top), (right - r, top))?;
        writeln!(self.out, "{:.2} {:.2} l", left + r, top)?;
        self.curve((left + r - k, top), (left, top - r + k), (left, top - r))?;
        writeln!(self.out, "{:.2} {:.2} l", left, bottom + r)?;
        self.curve((left, bottom + r - k), (left + r - k, bottom), (left + r, bottom))?;
        writeln!(self.out, "h")
    }

    fn circle_path(&mut self, cx: f32, cy: f32, radius: f32) -> io::Result<()> {
        let (x, y) = self.point(cx, cy);
        let r = mm(radius);
        let k = r * KAPPA;

        writeln!(self.out, "{:.2} {:.2} m", x + r, y)?;
        self.curve((x + r, y + k), (x + k, y + r), (x, y + r))?;
        self.curve((x - k, y + r), (x - r, y + k), (x - r, y))?;
        self.curve((x - r, y - k), (x - k, y - r), (x, y - r))?;
        self.curve((x + k, y - r), (x + r, y - k), (x + r, y))?;
        writeln!(self.out, "h")
    }

    fn draw(&mut self, op: &DrawOp) -> io::Result<()> {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                radius,
                fill,
                stroke,
            } => {
                writeln!(self.out, "q")?;
                if let Some(color) = fill {
                    self.fill_color(*color)?;
                }
                if let Some(stroke) = stroke {
                    self.stroke_style(*stroke)?;
                }
                if *radius > 0.0 {
                    self.rounded_rect_path(*x, *y, *width, *height, *radius)?;
                } else {
                    let (left, top) = self.point(*x, *y);
                    writeln!(
                        self.out,
                        "{:.2} {:.2} {:.2} {:.2} re",
                        left,
                        top - mm(*height),
                        mm(*width),
                        mm(*height)
                    )?;
                }
                self.paint(*fill, *stroke)?;
                writeln!(self.out, "Q")
            }
            DrawOp::Circle {
                cx,
                cy,
                radius,
                fill,
            } => {
                writeln!(self.out, "q")?;
                self.fill_color(*fill)?;
                self.circle_path(*cx, *cy, *radius)?;
                writeln!(self.out, "f")?;
                writeln!(self.out, "Q")
            }
            DrawOp::Text { x, y, text, style } => {
                let (px, py) = self.point(*x, *y);
                writeln!(self.out, "BT")?;
                writeln!(self.out, "/{} {:.1} Tf", style.font.resource_name(), style.size)?;
                self.fill_color(style.color)?;
                writeln!(self.out, "{:.2} {:.2} Td", px, py)?;
                self.out.write_all(&pdf_literal(text))?;
                writeln!(self.out, " Tj")?;
                writeln!(self.out, "ET")
            }
        }
    }

    fn build(mut self) -> io::Result<Vec<u8>> {
        let page = self.page;
        for placed in &page.ops {
            self.draw(&placed.op)?;
        }
        Ok(self.out)
    }
}

/// Tracks byte offsets of numbered objects for the xref table.
struct ObjectWriter {
    out: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new() -> io::Result<Self> {
        let mut out = Vec::new();
        out.write_all(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n")?;
        Ok(Self {
            out,
            offsets: Vec::new(),
        })
    }

    fn object(&mut self, body: &[u8]) -> io::Result<usize> {
        self.offsets.push(self.out.len());
        let id = self.offsets.len();
        write!(self.out, "{id} 0 obj\n")?;
        self.out.write_all(body)?;
        self.out.write_all(b"\nendobj\n")?;
        Ok(id)
    }

    fn stream(&mut self, content: &[u8]) -> io::Result<usize> {
        let mut body = Vec::with_capacity(content.len() + 64);
        write!(body, "<< /Length {} >>\nstream\n", content.len())?;
        body.write_all(content)?;
        body.write_all(b"\nendstream")?;
        self.object(&body)
    }

    fn finish(mut self, root: usize, info: usize) -> io::Result<Vec<u8>> {
        let xref_at = self.out.len();
        let size = self.offsets.len() + 1;
        write!(self.out, "xref\n0 {size}\n0000000000 65535 f \n")?;
        for offset in &self.offsets {
            write!(self.out, "{:010} 00000 n \n", offset)?;
        }
        write!(
            self.out,
            "trailer\n<< /Size {size} /Root {root} 0 R /Info {info} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
        )?;
        Ok(self.out)
    }
}

fn font_object(font: Font) -> Vec<u8> {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        font.base_name()
    )
    .into_bytes()
}

/// Serialize `page` into a complete PDF file.
pub fn write_pdf(page: &Page) -> io::Result<Vec<u8>> {
    let content = ContentStream::new(page).build()?;
    let mut writer = ObjectWriter::new()?;

    // Object numbers are fixed by write order: 1 catalog, 2 pages, 3 page.
    writer.object(b"<< /Type /Catalog /Pages 2 0 R >>")?;
    writer.object(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>")?;
    let page_dict = format!(
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
         /Resources << /Font << /{} 4 0 R /{} 5 0 R >> >> /Contents 6 0 R >>",
        mm(page.width),
        mm(page.height),
        Font::Helvetica.resource_name(),
        Font::HelveticaBold.resource_name(),
    );
    writer.object(page_dict.as_bytes())?;
    writer.object(&font_object(Font::Helvetica))?;
    writer.object(&font_object(Font::HelveticaBold))?;
    writer.stream(&content)?;

    let mut info = Vec::new();
    info.write_all(b"<< /Title ")?;
    info.write_all(&pdf_literal(&page.title))?;
    info.write_all(b" /Producer ")?;
    info.write_all(&pdf_literal(PRODUCER))?;
    info.write_all(b" >>")?;
    let info_id = writer.object(&info)?;

    writer.finish(1, info_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::layout::palette;
    use crate::generators::page::{BoxMetrics, PageBuilder, Section, TextStyle};

    fn sample_metrics() -> BoxMetrics {
        BoxMetrics {
            top_offset: 3.0,
            corner_radius: 2.0,
            title_inset: 5.0,
            title_drop: 8.0,
            first_row_drop: 18.0,
            row_gap: 12.0,
            body_drop: 18.0,
            body_inset: 10.0,
        }
    }

    fn sample_page() -> Page {
        let mut builder = PageBuilder::new(210.0, 297.0, 20.0, sample_metrics()).title("Sample");
        builder
            .band(0.0, 50.0, palette::PRIMARY)
            .circle((30.0, 25.0), 12.0, palette::WHITE)
            .rect((20.0, 100.0, 170.0, 35.0), 2.0, Some(palette::TAX_TINT), None)
            .text((20.0, 70.0), "Hello (world)", &TextStyle::bold(12.0, palette::DARK));
        builder.finish()
    }

    #[test]
    fn test_literal_escaping() {
        assert_eq!(pdf_literal("a(b)c\\"), b"(a\\(b\\)c\\\\)".to_vec());
        assert_eq!(pdf_literal("\u{00a9} 2026"), b"(\xa9 2026)".to_vec());
        assert_eq!(pdf_literal("\u{1F4CB}x"), b"(?x)".to_vec());
    }

    #[test]
    fn test_literal_uses_winansi_high_range() {
        assert_eq!(pdf_literal("pa\u{20ac}s\u{2019}1"), b"(pa\x80s\x921)".to_vec());
        assert_eq!(
            pdf_literal("\u{201c}x\u{201d} \u{2013} \u{2026}"),
            b"(\x93x\x94 \x96 \x85)".to_vec()
        );
        assert_eq!(winansi_byte('\u{0178}'), Some(0x9f));
        assert_eq!(winansi_byte('\t'), None);
        assert_eq!(winansi_byte('\u{0100}'), None);
    }

    #[test]
    fn test_unencodable_text_is_rejected() {
        let mut builder = PageBuilder::new(210.0, 297.0, 20.0, sample_metrics());
        builder
            .section(Section::EmailDetails)
            .text((20.0, 70.0), "pw\u{1F511}", &TextStyle::regular(10.0, palette::BLACK));
        let page = builder.finish();

        match PdfRenderEngine.render(&page) {
            Err(GeneratorError::UnsupportedCharacter(section)) => {
                assert_eq!(section, Section::EmailDetails)
            }
            other => panic!("expected unsupported character, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn test_document_structure() {
        let bytes = write_pdf(&sample_page()).unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("/MediaBox [0 0 595.28 841.89]"));
        assert!(text.contains("(Hello \\(world\\)) Tj"));
        assert!(text.contains("/Title (Sample)"));
    }

    fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).rposition(|window| window == needle)
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = write_pdf(&sample_page()).unwrap();

        let startxref = rfind(&bytes, b"startxref\n").unwrap();
        let tail = std::str::from_utf8(&bytes[startxref + 10..]).unwrap();
        let xref_at: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(bytes[xref_at..].starts_with(b"xref"));

        let table = std::str::from_utf8(&bytes[xref_at..]).unwrap();
        let entries: Vec<&str> = table.lines().skip(3).take(7).collect();
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.len(), 19, "xref lines are 20 bytes with newline");
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn test_engine_name() {
        assert_eq!(PdfRenderEngine.name(), "native");
        assert!(PdfRenderEngine.render(&sample_page()).is_ok());
    }
}
