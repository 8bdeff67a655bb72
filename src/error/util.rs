//! Utility functions for error handling
//!
//! File helpers that attach the path and purpose to IO failures, so a
//! failed run names the extract that could not be read.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, SragError};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(SragError::io(
            path,
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found (needed for: {purpose})"),
            ),
        ));
    }

    if !path.is_file() {
        return Err(SragError::io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a file (expected a file for: {purpose})"),
            ),
        ));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "permission denied - check file permissions".to_string()
            }
            _ => format!("failed to open file for: {purpose}"),
        };
        SragError::io(path, io::Error::new(e.kind(), format!("{context}: {e}")))
    })
}

/// Create (or truncate) an output file, creating parent directories
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| SragError::io(parent, e))?;
        }
    }

    fs::File::create(path).map_err(|e| {
        SragError::io(
            path,
            io::Error::new(e.kind(), format!("failed to create file for: {purpose}: {e}")),
        )
    })
}
