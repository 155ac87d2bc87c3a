//! Search error types.

use thiserror::Error;

/// Errors raised when interpreting browse criteria.
///
/// Filtering itself never fails; these only come from turning user-facing
/// labels into criteria.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SearchError {
    /// Not one of the preset investment range labels.
    #[error("Unknown investment range: {label}")]
    UnknownRange {
        /// The label that did not match
        label: String,
    },

    /// Not one of recent, unread, alphabetical.
    #[error("Unknown sort order: {value}")]
    UnknownSortOrder {
        /// The value that did not match
        value: String,
    },
}

impl SearchError {
    /// Every search error is a rejected input.
    pub fn is_validation_error(&self) -> bool {
        true
    }
}

impl From<SearchError> for crate::Error {
    fn from(err: SearchError) -> Self {
        crate::Error::Search(err)
    }
}
