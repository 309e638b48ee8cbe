use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds for a single conversion run.
///
/// Value-level parse failures are not represented here: they degrade to
/// `NULL` inside the formatter and never abort a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("File '{}' not found", path.display())]
    FileNotFound { path: PathBuf },
    #[error("{0}")]
    ReadError(String),
}

impl From<csv::Error> for ConvertError {
    fn from(err: csv::Error) -> Self {
        ConvertError::ReadError(err.to_string())
    }
}
