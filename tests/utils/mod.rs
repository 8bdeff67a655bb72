//! Shared fixtures for the integration tests

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rand::Rng;
use rand::rngs::StdRng;

use srag_weekly::models::{LabFields, SurveillanceRecord, SymptomFlags};

/// Symptoms meeting the case definition: fever, cough and dyspnea
#[must_use]
pub fn symptomatic() -> SymptomFlags {
    SymptomFlags {
        fever: Some(1),
        cough: Some(1),
        dyspnea: Some(1),
        ..Default::default()
    }
}

/// A kept-eligible notification in week 12 of 2013 with the given lab fields
#[must_use]
pub fn notification(region: &str, week: i64, lab: LabFields) -> SurveillanceRecord {
    SurveillanceRecord {
        notification_week: Some(week),
        notification_date: NaiveDate::from_ymd_opt(2013, 3, 20),
        region: Some(region.to_string()),
        residence_region: Some(region.to_string()),
        symptoms: symptomatic(),
        lab,
        ..Default::default()
    }
}

/// Codes seen in extracts, plus null and out-of-domain values
const CODE_POOL: [Option<i64>; 8] = [None, Some(1), Some(2), Some(3), Some(4), Some(5), Some(9), Some(0)];

fn random_code(rng: &mut StdRng) -> Option<i64> {
    CODE_POOL[rng.random_range(0..CODE_POOL.len())]
}

/// Random lab fields drawing every field from the code pool
#[must_use]
pub fn random_lab(rng: &mut StdRng) -> LabFields {
    LabFields {
        immunofluorescence: random_code(rng),
        pcr_performed: random_code(rng),
        other_method: random_code(rng),
        pcr_result: random_code(rng),
        culture_result: random_code(rng),
        hemagglutination_result: random_code(rng),
        pcr_etiology: random_code(rng),
        hemagglutination_etiology: random_code(rng),
        flu_a: random_code(rng),
        flu_b: random_code(rng),
        rsv: random_code(rng),
        parainfluenza1: random_code(rng),
        parainfluenza2: random_code(rng),
        parainfluenza3: random_code(rng),
        adenovirus: random_code(rng),
        other: random_code(rng),
    }
}

/// Random notifications over a few regions and weeks; some miss the case
/// definition or the temporal key
#[must_use]
pub fn random_notifications(rng: &mut StdRng, count: usize) -> Vec<SurveillanceRecord> {
    const REGIONS: [&str; 3] = ["35", "33", "41"];
    (0..count)
        .map(|_| {
            let region = REGIONS[rng.random_range(0..REGIONS.len())];
            let week = rng.random_range(1..=6);
            let mut record = notification(region, week, random_lab(rng));
            if rng.random_bool(0.1) {
                record.symptoms = SymptomFlags::default();
            }
            if rng.random_bool(0.05) {
                record.notification_date = None;
            }
            record
        })
        .collect()
}

/// Write `contents` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}
