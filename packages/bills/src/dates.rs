//! Date parsing for the source site's date strings.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

use crate::error::{BillError, Result};

/// Marker preceding the communication date inside a procedure topic.
pub const COMMUNICATED_MARKER: &str = "COMUNICADO EL ";

/// Formats accepted for plain dates, tried in order.
const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static COMMUNICATED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"COMUNICADO EL (.{10})").expect("valid regex"));

/// Parse a date as published by the chambers.
///
/// Accepts `DD/MM/YYYY` (the site format), ISO `YYYY-MM-DD`, `DD-MM-YYYY`
/// and full RFC 3339 timestamps.
///
/// # Examples
/// ```
/// use parlamento_bills::dates::parse_date;
///
/// assert!(parse_date("04/03/2016").is_ok());
/// assert!(parse_date("2016-03-04").is_ok());
/// assert!(parse_date("ayer").is_err());
/// ```
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| BillError::InvalidDate(input.to_string()))
}

/// Extract the date that follows `COMUNICADO EL ` in a procedure topic.
///
/// The marker is followed by exactly ten characters of date text.
pub fn communicated_date(topic: &str) -> Option<NaiveDate> {
    let captures = COMMUNICATED_PATTERN.captures(topic)?;
    parse_date(captures.get(1)?.as_str()).ok()
}
