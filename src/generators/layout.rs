//! Layout table for the credentials document.
//!
//! All lengths are millimetres on an A4 page with the origin at the top-left
//! corner. Text positions are baselines. Font sizes are points.

/// RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Channels scaled to `0.0..=1.0`.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

pub mod palette {
    use super::Color;

    pub const PRIMARY: Color = Color(41, 98, 255);
    pub const SECONDARY: Color = Color(16, 185, 129);
    pub const DARK: Color = Color(31, 41, 55);
    pub const MEDIUM: Color = Color(75, 85, 99);
    pub const WARNING: Color = Color(245, 158, 11);
    pub const WARNING_BG: Color = Color(255, 251, 235);
    pub const WHITE: Color = Color(255, 255, 255);
    pub const BLACK: Color = Color(0, 0, 0);
    pub const TAX_TINT: Color = Color(248, 250, 252);
    pub const EMAIL_TINT: Color = Color(240, 253, 244);
    pub const NOTICE_TITLE: Color = Color(146, 64, 14);
    pub const NOTICE_TEXT: Color = Color(120, 53, 15);
    pub const FOOTER_MUTED: Color = Color(156, 163, 175);
}

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 20.0;

/// Points to millimetres.
pub const PT_TO_MM: f32 = 25.4 / 72.0;
/// Baseline-to-baseline distance as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

pub mod header {
    pub const HEIGHT: f32 = 50.0;
    pub const LOGO_CENTER: (f32, f32) = (30.0, 25.0);
    pub const LOGO_RADIUS: f32 = 12.0;
    pub const LOGO_GLYPH_AT: (f32, f32) = (27.0, 29.0);
    pub const LOGO_GLYPH_SIZE: f32 = 16.0;
    pub const NAME_AT: (f32, f32) = (50.0, 22.0);
    pub const NAME_SIZE: f32 = 16.0;
    pub const TAGLINE_AT: (f32, f32) = (50.0, 32.0);
    pub const TAGLINE_SIZE: f32 = 9.0;
}

pub mod body {
    pub const TITLE_Y: f32 = 70.0;
    pub const TITLE_SIZE: f32 = 18.0;
    pub const AFTER_TITLE: f32 = 20.0;
    pub const GREETING_SIZE: f32 = 12.0;
    pub const AFTER_GREETING: f32 = 15.0;
    pub const INTRO_SIZE: f32 = 10.0;
    pub const AFTER_INTRO: f32 = 20.0;
}

/// Geometry shared by the tinted detail boxes and the notice callout.
pub mod section_box {
    /// Box top sits this far above the section cursor.
    pub const TOP_OFFSET: f32 = 3.0;
    pub const HEIGHT: f32 = 35.0;
    pub const NOTICE_HEIGHT: f32 = 30.0;
    pub const CORNER_RADIUS: f32 = 2.0;
    pub const BORDER_WIDTH: f32 = 0.3;
    pub const NOTICE_BORDER_WIDTH: f32 = 1.0;
    pub const TITLE_INSET: f32 = 5.0;
    pub const TITLE_DROP: f32 = 8.0;
    pub const TITLE_SIZE: f32 = 12.0;
    pub const NOTICE_TITLE_SIZE: f32 = 11.0;
    pub const FIRST_ROW_DROP: f32 = 18.0;
    pub const ROW_GAP: f32 = 12.0;
    pub const ROW_SIZE: f32 = 10.0;
    pub const NOTICE_BODY_DROP: f32 = 18.0;
    pub const NOTICE_BODY_SIZE: f32 = 9.0;
    pub const NOTICE_BODY_INSET: f32 = 10.0;
    /// Cursor advance from the last row to the next section.
    pub const AFTER: f32 = 25.0;
}

/// Horizontal offsets of labels and values, relative to the margin.
pub mod columns {
    pub const LABEL: f32 = 8.0;
    pub const PIN_VALUE: f32 = 45.0;
    pub const PIN_SECRET_LABEL: f32 = 100.0;
    pub const PIN_SECRET_VALUE: f32 = 135.0;
    pub const EMAIL_VALUE: f32 = 35.0;
    pub const EMAIL_SECRET_VALUE: f32 = 50.0;
}

pub mod footer {
    pub const HEIGHT: f32 = 25.0;
    pub const ADDRESS_DROP: f32 = 8.0;
    pub const ADDRESS_SIZE: f32 = 8.0;
    pub const COPYRIGHT_DROP: f32 = 18.0;
    pub const COPYRIGHT_SIZE: f32 = 7.0;
}
