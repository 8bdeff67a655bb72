//! Logging utilities for output and progress tracking

pub mod log;
pub mod progress;

pub use log::{FileOp, log_file_complete, log_file_start, log_stage, log_warning};
pub use progress::{
    attach, create_main_progress_bar, create_multi_progress, create_spinner, finish_progress_bar,
    hidden_or,
};
