//! Date parsing with a list of accepted formats

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::DateFormatConfig;

/// Parse a date string with multiple format attempts
///
/// Formats carrying a time component are parsed as timestamps and truncated
/// to the date. Returns `None` when no format matches.
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    config.date_formats.iter().find_map(|format| {
        NaiveDate::parse_from_str(s, format).ok().or_else(|| {
            NaiveDateTime::parse_from_str(s, format)
                .ok()
                .map(|datetime| datetime.date())
        })
    })
}

/// Render a date with the configured output format
#[must_use]
pub fn format_date(date: NaiveDate, config: &DateFormatConfig) -> String {
    date.format(&config.output_format).to_string()
}
