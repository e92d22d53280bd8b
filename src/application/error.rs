use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{InvalidAmount, LedgerError};
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(InvalidAmount),

    #[error("Cannot record expense: {0}")]
    Ledger(LedgerError),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Cannot read import file {}: {source}", path.display())]
    ImportSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to export CSV to {}: {source}", path.display())]
    ExportFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount(e) => AppError::InvalidAmount(e),
            other => AppError::Ledger(other),
        }
    }
}
