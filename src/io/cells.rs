//! Cell-level decoding shared by the extract readers

use crate::config::ReaderConfig;
use crate::error::{Result, SragError};
use crate::io::region::{is_missing, normalize_region_code};
use crate::models::SurveillanceRecord;
use crate::schema::columns;
use crate::utils::dates::parse_date_string;

fn invalid_code(column: &str, value: impl Into<String>) -> SragError {
    SragError::InvalidCode {
        column: column.to_string(),
        value: value.into(),
    }
}

/// Convert a floating point code; NaN is missing, fractions are malformed
#[allow(clippy::cast_possible_truncation)]
pub fn float_code(column: &str, value: f64) -> Result<Option<i64>> {
    if value.is_nan() {
        return Ok(None);
    }
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        return Ok(Some(value as i64));
    }
    Err(invalid_code(column, value.to_string()))
}

/// Parse a coded cell: `"1"` and `"1.0"` are both 1, missing markers are null
pub fn parse_code(column: &str, raw: &str) -> Result<Option<i64>> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(Some(value));
    }

    trimmed
        .parse::<f64>()
        .map_err(|_| invalid_code(column, raw))
        .and_then(|value| float_code(column, value).map_err(|_| invalid_code(column, raw)))
}

/// Store one target-column cell on `record`
///
/// Typed columns are decoded; other target columns are kept verbatim
/// (trimmed) unless empty.
pub fn apply_cell(
    record: &mut SurveillanceRecord,
    column: &str,
    raw: &str,
    config: &ReaderConfig,
) -> Result<()> {
    match column {
        columns::NOTIFICATION_WEEK => record.notification_week = parse_code(column, raw)?,
        columns::NOTIFICATION_DATE => {
            record.notification_date = parse_date_string(raw, &config.date_format_config);
        }
        columns::REGION => record.region = normalize_region_code(raw)?,
        columns::RESIDENCE_REGION => record.residence_region = normalize_region_code(raw)?,
        _ => {
            if let Some(field) = record.symptoms.field_mut(column) {
                *field = parse_code(column, raw)?;
            } else if let Some(field) = record.lab.field_mut(column) {
                *field = parse_code(column, raw)?;
            } else {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    record
                        .passthrough
                        .insert(column.to_string(), trimmed.to_string());
                }
            }
        }
    }
    Ok(())
}

/// Whether `record` passes the configured target-region pre-filter
#[must_use]
pub fn in_target_region(record: &SurveillanceRecord, config: &ReaderConfig) -> bool {
    config
        .target_region
        .as_deref()
        .is_none_or(|target| record.region_for(config.region_basis) == Some(target))
}
