//! This module contains errors pertaining to enriching a computed layout with
//! slot values read from a deployed contract.

use thiserror::Error;

/// Errors that occur while writing slot values onto a layout in
/// [`crate::enrichment`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Requested {expected} slot values but received {actual}")]
    ValueCountMismatch { expected: usize, actual: usize },

    #[error("Slot value source failed: {_0}")]
    Source(String),
}

impl Error {
    /// Constructs a source error with the provided `message`.
    ///
    /// This exists so that implementations backed by arbitrary transports can
    /// surface their failures without this crate depending on them.
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }
}

/// The result type for methods that may have enrichment errors.
pub type Result<T> = std::result::Result<T, Error>;
