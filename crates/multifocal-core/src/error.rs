//! Error types for the multifocal core.
//!
//! Storage and history failures are typed so callers can distinguish a
//! rejected user action (page out of range, clear without confirmation)
//! from an I/O failure without string matching.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationReport;

/// Errors raised by a [`KeyValueStore`](crate::storage::KeyValueStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading a stored value failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a value failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing a stored value failed.
    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backing store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Errors raised by [`History`](crate::history::History) operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The backing store rejected a read or write.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The history could not be serialized for persistence.
    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A page outside `[1, page_count]` was requested.
    #[error("page {requested} is out of range (1..={count})")]
    PageOutOfRange { requested: usize, count: usize },

    /// `confirm_clear` was called without a pending `request_clear`.
    #[error("clearing the history was not requested")]
    ClearNotRequested,
}

/// Errors raised when submitting the measurement form.
#[derive(Debug, Error)]
pub enum FormError {
    /// One or more fields failed validation.
    #[error("invalid measurements: {0}")]
    Invalid(ValidationReport),

    /// The record was computed but could not be saved.
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl HistoryError {
    /// Returns `true` if the error was caused by the user rather than the store.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            HistoryError::PageOutOfRange { .. } | HistoryError::ClearNotRequested
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_classified() {
        assert!(HistoryError::ClearNotRequested.is_rejection());
        assert!(HistoryError::PageOutOfRange {
            requested: 4,
            count: 3
        }
        .is_rejection());
        assert!(!HistoryError::Storage(StorageError::InvalidKey("../x".into())).is_rejection());
    }

    #[test]
    fn page_out_of_range_message() {
        let err = HistoryError::PageOutOfRange {
            requested: 5,
            count: 2,
        };
        assert_eq!(err.to_string(), "page 5 is out of range (1..=2)");
    }
}
