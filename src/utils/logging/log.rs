//! Log lines for extract reads, output writes and pipeline stages

use std::path::Path;
use std::time::Duration;

/// Direction of a file operation, which decides the wording of its log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// Reading an extract
    Read,
    /// Writing an output table or summary
    Write,
}

impl FileOp {
    const fn progressive(self) -> &'static str {
        match self {
            Self::Read => "Reading",
            Self::Write => "Writing",
        }
    }

    const fn past(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Wrote",
        }
    }

    const fn preposition(self) -> &'static str {
        match self {
            Self::Read => "from",
            Self::Write => "to",
        }
    }
}

fn start_message(op: FileOp, what: &str, path: &Path) -> String {
    format!("{} {what} {} {}", op.progressive(), op.preposition(), path.display())
}

fn completion_message(
    op: FileOp,
    path: &Path,
    items: usize,
    unit: &str,
    elapsed: Option<Duration>,
) -> String {
    let message = format!(
        "{} {items} {unit} {} {}",
        op.past(),
        op.preposition(),
        path.display()
    );
    match elapsed {
        Some(duration) => format!("{message} in {duration:?}"),
        None => message,
    }
}

/// Log the start of a read or write, e.g. "Reading delimited extract from a.csv"
pub fn log_file_start(op: FileOp, what: &str, path: &Path) {
    log::info!("{}", start_message(op, what, path));
}

/// Log a finished read or write, e.g. "Wrote 14 weekly rows to w.csv"
pub fn log_file_complete(
    op: FileOp,
    path: &Path,
    items: usize,
    unit: &str,
    elapsed: Option<Duration>,
) {
    log::info!("{}", completion_message(op, path, items, unit, elapsed));
}

/// Log the end of a pipeline stage
pub fn log_stage(stage: &str, items: usize, elapsed: Duration) {
    log::info!("{stage}: {items} records in {elapsed:?}");
}

/// Warn about a condition, naming the file it concerns when there is one
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{} ({message})", path.display()),
        None => log::warn!("{message}"),
    }
}
