use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Database file '{}' does not exist.", .0.display())]
    MissingSource(PathBuf),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Coarse classification used by callers that only care whether the
/// source was absent or something went wrong while working on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingSource,
    Operational,
}

impl ExportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSource(_) => ErrorKind::MissingSource,
            Self::Db(_) | Self::Io(_) | Self::Csv(_) => ErrorKind::Operational,
        }
    }
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for ExportError {
    fn from(e: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        Self::Io(e.into_error())
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
