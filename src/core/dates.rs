// Date helpers shared by notes, digests and streaks

use crate::error::{Result, TilError};
use chrono::NaiveDate;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Note files are named exactly YYYY-MM-DD.md
static NOTE_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})\.md$").expect("valid regex"));

/// Date embedded in a note filename, if it is a real calendar date
pub fn note_date(filename: &str) -> Option<NaiveDate> {
    let caps = NOTE_FILENAME.captures(filename)?;
    NaiveDate::parse_from_str(&caps[1], DATE_FORMAT).ok()
}

/// Same as [`note_date`] but takes a path
pub fn note_date_from_path(path: &Path) -> Option<NaiveDate> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(note_date)
}

/// Parse a user-supplied `YYYY-MM-DD`
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.len() != 10 {
        return Err(TilError::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| TilError::InvalidDate(input.to_string()))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
