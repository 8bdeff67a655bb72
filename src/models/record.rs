//! Surveillance notification model
//!
//! A `SurveillanceRecord` is one SRAG notification as read from an extract.
//! It is read-only input to the classification core.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::RegionBasis;
use crate::schema::columns;

/// Case-definition symptom flags and clinical outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomFlags {
    /// `FEBRE`
    pub fever: Option<i64>,
    /// `TOSSE`
    pub cough: Option<i64>,
    /// `GARGANTA`
    pub sore_throat: Option<i64>,
    /// `DISPNEIA`
    pub dyspnea: Option<i64>,
    /// `SATURACAO`
    pub low_saturation: Option<i64>,
    /// `DESC_RESP`
    pub respiratory_distress: Option<i64>,
    /// `EVOLUCAO`
    pub clinical_outcome: Option<i64>,
}

/// Legacy laboratory fields, across both eras of the reporting form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabFields {
    /// `IFI` - immunofluorescence performed (and positive)
    pub immunofluorescence: Option<i64>,
    /// `PCR` - PCR performed
    pub pcr_performed: Option<i64>,
    /// `OUT_METODO` - another method used
    pub other_method: Option<i64>,
    /// `PCR_RES`
    pub pcr_result: Option<i64>,
    /// `CULT_RES`
    pub culture_result: Option<i64>,
    /// `HEMA_RES`
    pub hemagglutination_result: Option<i64>,
    /// `PCR_ETIOL`
    pub pcr_etiology: Option<i64>,
    /// `HEMA_ETIOL`
    pub hemagglutination_etiology: Option<i64>,
    /// `RES_FLUA`
    pub flu_a: Option<i64>,
    /// `RES_FLUB`
    pub flu_b: Option<i64>,
    /// `RES_VSR`
    pub rsv: Option<i64>,
    /// `RES_PARA1`
    pub parainfluenza1: Option<i64>,
    /// `RES_PARA2`
    pub parainfluenza2: Option<i64>,
    /// `RES_PARA3`
    pub parainfluenza3: Option<i64>,
    /// `RES_ADNO`
    pub adenovirus: Option<i64>,
    /// `RES_OUTRO`
    pub other: Option<i64>,
}

impl LabFields {
    /// Number of fields inspected by the result-category guards
    pub const RESULT_FIELD_COUNT: usize = 10;

    /// The ten fields that decide whether a tested case is delayed or inconclusive
    #[must_use]
    pub const fn result_fields(&self) -> [Option<i64>; Self::RESULT_FIELD_COUNT] {
        [
            self.pcr_result,
            self.hemagglutination_result,
            self.flu_a,
            self.flu_b,
            self.rsv,
            self.parainfluenza1,
            self.parainfluenza2,
            self.parainfluenza3,
            self.adenovirus,
            self.other,
        ]
    }

    /// Per-pathogen flags pointing at agents other than influenza and RSV
    #[must_use]
    pub const fn other_pathogen_flags(&self) -> [Option<i64>; 5] {
        [
            self.parainfluenza1,
            self.parainfluenza2,
            self.parainfluenza3,
            self.adenovirus,
            self.other,
        ]
    }

    /// All coded values in `columns::LAB_COLUMNS` order
    #[must_use]
    pub const fn coded_values(&self) -> [Option<i64>; 16] {
        [
            self.immunofluorescence,
            self.pcr_performed,
            self.other_method,
            self.pcr_result,
            self.culture_result,
            self.hemagglutination_result,
            self.pcr_etiology,
            self.hemagglutination_etiology,
            self.flu_a,
            self.flu_b,
            self.rsv,
            self.parainfluenza1,
            self.parainfluenza2,
            self.parainfluenza3,
            self.adenovirus,
            self.other,
        ]
    }

    /// Mutable access to a field by its extract column name
    pub fn field_mut(&mut self, column: &str) -> Option<&mut Option<i64>> {
        let field = match column {
            columns::IMMUNOFLUORESCENCE => &mut self.immunofluorescence,
            columns::PCR_PERFORMED => &mut self.pcr_performed,
            columns::OTHER_METHOD => &mut self.other_method,
            columns::PCR_RESULT => &mut self.pcr_result,
            columns::CULTURE_RESULT => &mut self.culture_result,
            columns::HEMAGGLUTINATION_RESULT => &mut self.hemagglutination_result,
            columns::PCR_ETIOLOGY => &mut self.pcr_etiology,
            columns::HEMAGGLUTINATION_ETIOLOGY => &mut self.hemagglutination_etiology,
            columns::FLU_A => &mut self.flu_a,
            columns::FLU_B => &mut self.flu_b,
            columns::RSV => &mut self.rsv,
            columns::PARAINFLUENZA1 => &mut self.parainfluenza1,
            columns::PARAINFLUENZA2 => &mut self.parainfluenza2,
            columns::PARAINFLUENZA3 => &mut self.parainfluenza3,
            columns::ADENOVIRUS => &mut self.adenovirus,
            columns::OTHER => &mut self.other,
            _ => return None,
        };
        Some(field)
    }
}

impl SymptomFlags {
    /// All coded values in `columns::SYMPTOM_COLUMNS` order
    #[must_use]
    pub const fn coded_values(&self) -> [Option<i64>; 7] {
        [
            self.fever,
            self.cough,
            self.sore_throat,
            self.dyspnea,
            self.low_saturation,
            self.respiratory_distress,
            self.clinical_outcome,
        ]
    }

    /// Mutable access to a field by its extract column name
    pub fn field_mut(&mut self, column: &str) -> Option<&mut Option<i64>> {
        let field = match column {
            columns::FEVER => &mut self.fever,
            columns::COUGH => &mut self.cough,
            columns::SORE_THROAT => &mut self.sore_throat,
            columns::DYSPNEA => &mut self.dyspnea,
            columns::LOW_SATURATION => &mut self.low_saturation,
            columns::RESPIRATORY_DISTRESS => &mut self.respiratory_distress,
            columns::CLINICAL_OUTCOME => &mut self.clinical_outcome,
            _ => return None,
        };
        Some(field)
    }
}

/// One SRAG notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveillanceRecord {
    /// `SEM_NOT` - epidemiological week of notification
    pub notification_week: Option<i64>,
    /// `DT_NOTIFIC`
    pub notification_date: Option<NaiveDate>,
    /// `SG_UF_NOT` - normalized notification region code
    pub region: Option<String>,
    /// `SG_UF` - normalized residence region code
    pub residence_region: Option<String>,
    /// Symptom flags and outcome
    pub symptoms: SymptomFlags,
    /// Laboratory fields
    pub lab: LabFields,
    /// Projected columns carried through without interpretation
    pub passthrough: BTreeMap<String, String>,
}

impl SurveillanceRecord {
    /// Region code used as aggregation key for the given basis
    #[must_use]
    pub fn region_for(&self, basis: RegionBasis) -> Option<&str> {
        match basis {
            RegionBasis::Notification => self.region.as_deref(),
            RegionBasis::Residence => self.residence_region.as_deref(),
        }
    }

    /// Whether both temporal keys are present
    #[must_use]
    pub const fn has_temporal_key(&self) -> bool {
        self.notification_week.is_some() && self.notification_date.is_some()
    }
}
