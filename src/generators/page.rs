//! Page model and the builder used by document templates.
//!
//! A template never emits PDF operators itself. It describes the page as a
//! list of drawing operations, grouped into named sections, and a render
//! engine turns that list into bytes.

use super::fonts::{wrap_text, Font};
use super::layout::{Color, LINE_HEIGHT_FACTOR, PT_TO_MM};

/// Named regions of the credentials document, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Title,
    Intro,
    TaxDetails,
    EmailDetails,
    Notice,
    Footer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub color: Color,
}

impl TextStyle {
    pub fn regular(size: f32, color: Color) -> Self {
        Self {
            font: Font::Helvetica,
            size,
            color,
        }
    }

    pub fn bold(size: f32, color: Color) -> Self {
        Self {
            font: Font::HelveticaBold,
            size,
            color,
        }
    }

    /// Baseline-to-baseline distance in millimetres.
    pub fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT_FACTOR * PT_TO_MM
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        fill: Color,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
    },
}

/// A drawing operation tagged with the section it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOp {
    pub section: Section,
    pub op: DrawOp,
}

/// One fixed-size page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub ops: Vec<PlacedOp>,
}

impl Page {
    /// Sections in the order they were first drawn.
    pub fn sections(&self) -> Vec<Section> {
        let mut seen = Vec::new();
        for placed in &self.ops {
            if !seen.contains(&placed.section) {
                seen.push(placed.section);
            }
        }
        seen
    }

    /// Text runs in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|placed| match &placed.op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn section_texts(&self, section: Section) -> Vec<&str> {
        self.ops
            .iter()
            .filter(|placed| placed.section == section)
            .filter_map(|placed| match &placed.op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A bold label followed by a plain value on the same baseline.
#[derive(Debug, Clone)]
pub struct LabeledValue {
    pub label: String,
    pub label_x: f32,
    pub value: String,
    pub value_x: f32,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, label_x: f32, value: impl Into<String>, value_x: f32) -> Self {
        Self {
            label: label.into(),
            label_x,
            value: value.into(),
            value_x,
        }
    }
}

/// Bordered, tinted box with a title and rows of labeled values.
#[derive(Debug, Clone)]
pub struct LabeledBox {
    pub title: String,
    pub title_style: TextStyle,
    pub tint: Color,
    pub border: Stroke,
    pub height: f32,
    pub label_style: TextStyle,
    pub value_style: TextStyle,
    /// Each inner vector is one baseline.
    pub rows: Vec<Vec<LabeledValue>>,
}

/// Bordered box with a title and a wrapped paragraph.
#[derive(Debug, Clone)]
pub struct Callout {
    pub title: String,
    pub title_style: TextStyle,
    pub body: String,
    pub body_style: TextStyle,
    pub tint: Color,
    pub border: Stroke,
    pub height: f32,
}

/// Geometry that boxes share with the template's layout table.
#[derive(Debug, Clone, Copy)]
pub struct BoxMetrics {
    pub top_offset: f32,
    pub corner_radius: f32,
    pub title_inset: f32,
    pub title_drop: f32,
    pub first_row_drop: f32,
    pub row_gap: f32,
    pub body_drop: f32,
    pub body_inset: f32,
}

/// Cursor-based builder over a [`Page`].
///
/// `x` for boxes is the left margin; the cursor tracks the current baseline.
pub struct PageBuilder {
    page: Page,
    section: Section,
    cursor: f32,
    margin: f32,
    content_width: f32,
    metrics: BoxMetrics,
}

impl PageBuilder {
    pub fn new(width: f32, height: f32, margin: f32, metrics: BoxMetrics) -> Self {
        Self {
            page: Page {
                width,
                height,
                title: String::new(),
                ops: Vec::new(),
            },
            section: Section::Header,
            cursor: 0.0,
            margin,
            content_width: width - margin * 2.0,
            metrics,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.page.title = title.into();
        self
    }

    /// Start tagging subsequent operations with `section`.
    pub fn section(&mut self, section: Section) -> &mut Self {
        self.section = section;
        self
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn move_to(&mut self, y: f32) -> &mut Self {
        self.cursor = y;
        self
    }

    pub fn advance(&mut self, dy: f32) -> &mut Self {
        self.cursor += dy;
        self
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    fn push(&mut self, op: DrawOp) {
        self.page.ops.push(PlacedOp {
            section: self.section,
            op,
        });
    }

    pub fn rect(
        &mut self,
        (x, y, width, height): (f32, f32, f32, f32),
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    ) -> &mut Self {
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            radius,
            fill,
            stroke,
        });
        self
    }

    /// Full-width filled band.
    pub fn band(&mut self, y: f32, height: f32, color: Color) -> &mut Self {
        let width = self.page.width;
        self.rect((0.0, y, width, height), 0.0, Some(color), None)
    }

    pub fn circle(&mut self, (cx, cy): (f32, f32), radius: f32, fill: Color) -> &mut Self {
        self.push(DrawOp::Circle {
            cx,
            cy,
            radius,
            fill,
        });
        self
    }

    pub fn text(&mut self, (x, y): (f32, f32), text: impl Into<String>, style: &TextStyle) -> &mut Self {
        self.push(DrawOp::Text {
            x,
            y,
            text: text.into(),
            style: style.clone(),
        });
        self
    }

    /// Text at the margin on the cursor's baseline.
    pub fn line(&mut self, text: impl Into<String>, style: &TextStyle) -> &mut Self {
        let at = (self.margin, self.cursor);
        self.text(at, text, style)
    }

    /// Word-wrapped paragraph starting at `(x, y)`; returns the number of lines.
    pub fn wrapped_paragraph(
        &mut self,
        (x, y): (f32, f32),
        max_width: f32,
        text: &str,
        style: &TextStyle,
    ) -> usize {
        let lines = wrap_text(text, style.font, style.size, max_width);
        let step = style.line_height();
        for (i, line) in lines.iter().enumerate() {
            self.text((x, y + step * i as f32), line.as_str(), style);
        }
        lines.len()
    }

    fn outline(&mut self, height: f32, tint: Color, border: Stroke) {
        let top = self.cursor - self.metrics.top_offset;
        let frame = (self.margin, top, self.content_width, height);
        let radius = self.metrics.corner_radius;
        self.rect(frame, radius, Some(tint), Some(border));
    }

    /// Draw a labeled box whose title sits just under the cursor.
    ///
    /// Leaves the cursor on the last row's baseline.
    pub fn labeled_box(&mut self, spec: &LabeledBox) -> &mut Self {
        self.outline(spec.height, spec.tint, spec.border);

        let title_at = (
            self.margin + self.metrics.title_inset,
            self.cursor + self.metrics.title_drop,
        );
        self.text(title_at, spec.title.as_str(), &spec.title_style);

        self.cursor += self.metrics.first_row_drop;
        for (i, row) in spec.rows.iter().enumerate() {
            if i > 0 {
                self.cursor += self.metrics.row_gap;
            }
            for cell in row {
                let y = self.cursor;
                self.text((self.margin + cell.label_x, y), cell.label.as_str(), &spec.label_style);
                self.text((self.margin + cell.value_x, y), cell.value.as_str(), &spec.value_style);
            }
        }
        self
    }

    /// Draw a callout whose body is wrapped to the box width minus its inset.
    pub fn callout(&mut self, spec: &Callout) -> &mut Self {
        self.outline(spec.height, spec.tint, spec.border);

        let left = self.margin + self.metrics.title_inset;
        let title_at = (left, self.cursor + self.metrics.title_drop);
        self.text(title_at, spec.title.as_str(), &spec.title_style);

        let body_at = (left, self.cursor + self.metrics.body_drop);
        let width = self.content_width - self.metrics.body_inset;
        self.wrapped_paragraph(body_at, width, &spec.body, &spec.body_style);
        self
    }

    pub fn finish(self) -> Page {
        self.page
    }
}
