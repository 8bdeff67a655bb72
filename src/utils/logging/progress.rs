//! Progress reporting for reading and writing extracts, using indicatif

use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Default style for a main progress bar
pub const DEFAULT_MAIN_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}) {msg}";

/// Default style for a spinner
pub const DEFAULT_SPINNER_TEMPLATE: &str = "{spinner:.green} {elapsed_precise} {pos} rows {msg}";

/// Create a main progress bar with a standardized style
///
/// # Arguments
/// * `length` - Total length for the progress bar
/// * `description` - Optional description to display as the initial message
#[must_use]
pub fn create_main_progress_bar(length: u64, description: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(length);
    let style = ProgressStyle::default_bar()
        .template(DEFAULT_MAIN_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);

    if let Some(desc) = description {
        pb.set_message(desc.to_string());
    }
    pb
}

/// Create a spinner for operations without a known length
///
/// The spinner does not tick until [`attach`] starts it, so that it can be
/// added to a [`MultiProgress`] first.
#[must_use]
pub fn create_spinner(message: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(DEFAULT_SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    if let Some(msg) = message {
        pb.set_message(msg.to_string());
    }
    pb
}

/// Create a multi-progress display with a main bar counting files
#[must_use]
pub fn create_multi_progress(total: u64, description: Option<&str>) -> (MultiProgress, ProgressBar) {
    let mp = MultiProgress::new();
    let main_pb = mp.add(create_main_progress_bar(total, description));
    (mp, main_pb)
}

/// Place `pb` under `multi` when given, and start its steady tick
///
/// Bars read in parallel must share one `MultiProgress`; standalone bars
/// would redraw over each other.
#[must_use]
pub fn attach(multi: Option<&MultiProgress>, pb: ProgressBar) -> ProgressBar {
    let pb = match multi {
        Some(mp) => mp.add(pb),
        None => pb,
    };
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// A visible bar from `make` when `enabled`, a hidden one otherwise
#[must_use]
pub fn hidden_or(enabled: bool, make: impl FnOnce() -> ProgressBar) -> ProgressBar {
    if enabled { make() } else { ProgressBar::hidden() }
}

/// Finish a progress bar with a completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        pb.finish_with_message(msg.to_string());
    } else {
        pb.finish();
    }
}
