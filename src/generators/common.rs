//! Common utilities for document generation.
//!
//! Shared helpers for dates, file names, MIME types and Typst escaping.

use chrono::{NaiveDate, Utc};
use std::path::Path;

/// Today's date in UTC.
///
/// File names carry the UTC calendar date, so a sheet generated shortly
/// after local midnight east of Greenwich is still dated the previous day.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Detect MIME type from filename.
pub fn detect_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

/// Build `<name>_ITax_Credentials_<YYYY-MM-DD>.<extension>`.
///
/// The name is trimmed and stripped of characters that are unsafe in file
/// names; ordinary names pass through unchanged.
pub fn credentials_filename(owner_name: &str, date: NaiveDate, extension: &str) -> String {
    let mut name = sanitize_filename::sanitize(owner_name.trim());
    if name.is_empty() {
        name = "customer".to_string();
    }
    format!(
        "{}_ITax_Credentials_{}.{}",
        name,
        format_iso_date(date),
        extension
    )
}

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}
