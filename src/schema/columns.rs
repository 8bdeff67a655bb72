//! Column names of SINAN SRAG extracts and of the derived outputs

/// `SEM_NOT`
pub const NOTIFICATION_WEEK: &str = "SEM_NOT";
/// `DT_NOTIFIC`
pub const NOTIFICATION_DATE: &str = "DT_NOTIFIC";
/// `SG_UF_NOT`
pub const REGION: &str = "SG_UF_NOT";
/// `SG_UF`
pub const RESIDENCE_REGION: &str = "SG_UF";

pub const FEVER: &str = "FEBRE";
pub const COUGH: &str = "TOSSE";
pub const SORE_THROAT: &str = "GARGANTA";
pub const DYSPNEA: &str = "DISPNEIA";
pub const LOW_SATURATION: &str = "SATURACAO";
pub const RESPIRATORY_DISTRESS: &str = "DESC_RESP";
pub const CLINICAL_OUTCOME: &str = "EVOLUCAO";

pub const IMMUNOFLUORESCENCE: &str = "IFI";
pub const PCR_PERFORMED: &str = "PCR";
pub const OTHER_METHOD: &str = "OUT_METODO";
pub const PCR_RESULT: &str = "PCR_RES";
pub const CULTURE_RESULT: &str = "CULT_RES";
pub const HEMAGGLUTINATION_RESULT: &str = "HEMA_RES";
pub const PCR_ETIOLOGY: &str = "PCR_ETIOL";
pub const HEMAGGLUTINATION_ETIOLOGY: &str = "HEMA_ETIOL";
pub const FLU_A: &str = "RES_FLUA";
pub const FLU_B: &str = "RES_FLUB";
pub const RSV: &str = "RES_VSR";
pub const PARAINFLUENZA1: &str = "RES_PARA1";
pub const PARAINFLUENZA2: &str = "RES_PARA2";
pub const PARAINFLUENZA3: &str = "RES_PARA3";
pub const ADENOVIRUS: &str = "RES_ADNO";
pub const OTHER: &str = "RES_OUTRO";

/// Integer-coded columns the case definition reads
pub const SYMPTOM_COLUMNS: [&str; 7] = [
    FEVER,
    COUGH,
    SORE_THROAT,
    DYSPNEA,
    LOW_SATURATION,
    RESPIRATORY_DISTRESS,
    CLINICAL_OUTCOME,
];

/// Integer-coded columns the lab classifier reads, in `LabFields` order
pub const LAB_COLUMNS: [&str; 16] = [
    IMMUNOFLUORESCENCE,
    PCR_PERFORMED,
    OTHER_METHOD,
    PCR_RESULT,
    CULTURE_RESULT,
    HEMAGGLUTINATION_RESULT,
    PCR_ETIOLOGY,
    HEMAGGLUTINATION_ETIOLOGY,
    FLU_A,
    FLU_B,
    RSV,
    PARAINFLUENZA1,
    PARAINFLUENZA2,
    PARAINFLUENZA3,
    ADENOVIRUS,
    OTHER,
];

/// Columns kept from an extract, in output order
///
/// Anything not in this list is dropped on read. Columns here that are not
/// modelled as typed fields travel as pass-through strings.
pub const TARGET_COLUMNS: &[&str] = &[
    "SEM_NOT", "DT_NOTIFIC", "SG_UF_NOT", "DT_INTERNA", "DT_SIN_PRI", "SRAG2012", "DT_DIGITA",
    "FEBRE", "TOSSE", "GARGANTA", "DISPNEIA", "SATURACAO", "DESC_RESP", "EVOLUCAO",
    "DT_COLETA", "IFI", "DT_IFI", "PCR", "OUT_METODO", "DS_OUTMET", "DT_OUTMET", "RES_FLUA",
    "RES_FLUASU", "RES_FLUB", "RES_VSR", "RES_PARA1", "RES_PARA2", "RES_PARA3", "RES_ADNO",
    "RES_OUTRO", "DT_PCR", "PCR_RES", "PCR_ETIOL", "PCR_TIPO_H", "PCR_TIPO_N", "DT_CULTURA",
    "CULT_RES", "DT_HEMAGLU", "HEMA_RES", "HEMA_ETIOL", "HEM_TIPO_H", "HEM_TIPO_N", "VACINA",
    "DT_UT_DOSE", "ANT_PNEUMO", "DT_PNEUM", "CO_UF_INTE", "CO_MU_INTE", "CO_UN_INTE",
    "DT_ENCERRA", "NU_NOTIFIC", "ID_AGRAVO", "ID_MUNICIP", "ID_REGIONA", "ID_UNIDADE",
    "NU_IDADE_N", "CS_SEXO", "CS_GESTANT", "CS_RACA", "SG_UF", "ID_MN_RESI", "ID_RG_RESI",
];

/// Whether a target column is modelled as a typed record field
#[must_use]
pub fn is_modelled(column: &str) -> bool {
    column == NOTIFICATION_WEEK
        || column == NOTIFICATION_DATE
        || column == REGION
        || column == RESIDENCE_REGION
        || SYMPTOM_COLUMNS.contains(&column)
        || LAB_COLUMNS.contains(&column)
}

/// Derived outcome columns appended to cleaned records
pub mod derived {
    pub const FLU_A: &str = "FluA";
    pub const FLU_B: &str = "FluB";
    pub const VSR: &str = "VSR";
    pub const OTHERS: &str = "Others";
    pub const DELAYED: &str = "Delayed";
    pub const INCONCLUSIVE: &str = "Inconclusive";
    pub const NEGATIVE: &str = "Negative";
    pub const NOT_TESTED: &str = "NotTested";
    pub const TESTING_IGNORED: &str = "TestingIgnored";
    pub const POSITIVE_COUNT: &str = "PositiveCount";

    /// Derived columns in output order
    pub const ALL: [&str; 10] = [
        FLU_A,
        FLU_B,
        VSR,
        OTHERS,
        DELAYED,
        INCONCLUSIVE,
        NEGATIVE,
        NOT_TESTED,
        TESTING_IGNORED,
        POSITIVE_COUNT,
    ];
}

/// Weekly table header, in contract order
pub const WEEKLY_COLUMNS: [&str; 14] = [
    "Region",
    "Week",
    "FluA",
    "FluB",
    "VSR",
    "Others",
    "PositiveTotal",
    "Negative",
    "Inconclusive",
    "Delayed",
    "NotTested",
    "TestingIgnored",
    "Tested",
    "TotalCases",
];
