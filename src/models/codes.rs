//! Closed code domains used by the SINAN SRAG notification form
//!
//! Every coded field is an integer from a small closed set. Values outside
//! the set are legal input: they simply never match any predicate.

/// Yes/no flags used for symptoms and lab method indicators
pub mod flag {
    /// Yes (for `IFI`: performed and positive)
    pub const YES: i64 = 1;
    /// No
    pub const NO: i64 = 2;
    /// Ignored / unknown
    pub const IGNORED: i64 = 9;
}

/// Clinical outcome (`EVOLUCAO`)
pub mod outcome {
    /// Cure
    pub const CURE: i64 = 1;
    /// Death
    pub const DEATH: i64 = 2;
    /// Ignored / unknown
    pub const IGNORED: i64 = 9;
}

/// Result codes shared by PCR, hemagglutination and per-pathogen fields
pub mod result {
    /// Positive / detected
    pub const POSITIVE: i64 = 1;
    /// Negative / not detected
    pub const NEGATIVE: i64 = 2;
    /// Indeterminate
    pub const INDETERMINATE: i64 = 3;
    /// Pending or not performed
    pub const PENDING: i64 = 4;
}

/// Culture result (`CULT_RES`)
pub mod culture {
    /// Positive
    pub const POSITIVE: i64 = 1;
    /// Negative
    pub const NEGATIVE: i64 = 2;
    /// Not performed
    pub const NOT_PERFORMED: i64 = 4;
}

/// Etiology codes (`PCR_ETIOL`, `HEMA_ETIOL`)
pub mod etiology {
    /// Influenza A(H1N1)pdm09
    pub const FLU_A_H1N1: i64 = 1;
    /// Influenza A(H3N2)
    pub const FLU_A_H3N2: i64 = 2;
    /// Influenza B
    pub const FLU_B: i64 = 3;
    /// Influenza A, not subtyped
    pub const FLU_A_UNSUBTYPED: i64 = 4;
    /// Other agent
    pub const OTHER: i64 = 5;

    /// Every etiology implicating influenza A
    pub const FLU_A: [i64; 3] = [FLU_A_H1N1, FLU_A_H3N2, FLU_A_UNSUBTYPED];
}

/// Check whether a nullable code is one of `codes`; null never matches
#[inline]
#[must_use]
pub fn is_any(value: Option<i64>, codes: &[i64]) -> bool {
    value.is_some_and(|v| codes.contains(&v))
}

/// Check whether a nullable code is null or one of `codes`
#[inline]
#[must_use]
pub fn is_null_or_any(value: Option<i64>, codes: &[i64]) -> bool {
    value.is_none_or(|v| codes.contains(&v))
}
