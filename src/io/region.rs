//! Region code normalization
//!
//! Extracts carry the region either as an IBGE numeric code, sometimes
//! rendered as a float (`35.0`), or as a two-letter abbreviation.

use crate::error::{Result, SragError};

/// Normalize a raw region cell
///
/// Returns `Ok(None)` for an empty or missing cell, the integral digits for
/// a numeric code, the uppercased abbreviation for two letters, and
/// [`SragError::InvalidRegion`] for anything else.
pub fn normalize_region_code(raw: &str) -> Result<Option<String>> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }

    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Ok(Some(trimmed.to_ascii_uppercase()));
    }

    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let digits = trimmed.trim_start_matches('0');
        return Ok(Some(if digits.is_empty() { "0" } else { digits }.to_string()));
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => {
            Ok(Some(format!("{value:.0}")))
        }
        _ => Err(SragError::InvalidRegion(raw.to_string())),
    }
}

/// Empty cell or one of the missing-value markers found in extracts
#[must_use]
pub fn is_missing(cell: &str) -> bool {
    cell.is_empty()
        || cell.eq_ignore_ascii_case("na")
        || cell.eq_ignore_ascii_case("nan")
        || cell.eq_ignore_ascii_case("null")
}
