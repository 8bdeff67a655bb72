//! Shared helpers for Arrow access, date parsing, logging and progress

pub mod arrow;
pub mod dates;
pub mod logging;
