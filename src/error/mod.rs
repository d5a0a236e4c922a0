//! This module contains the primary error type for the resolver's interface.
//! It also re-exports the more specific error types that are
//! subsystem-specific.

pub mod enrichment;
pub mod packing;
pub mod reachability;

use thiserror::Error;

/// The interface result type for the library.
///
/// # Usage
///
/// Any function considered to be part of the public interface of the library
/// should return this result type. Subsystems should return the more-specific
/// child error types as appropriate.
///
/// Note that _all_ of the library is public in order to facilitate use-cases
/// beyond the ones designed for.
pub type Result<T> = std::result::Result<T, Error>;

/// The interface error type for the library.
///
/// All errors returned from the library interface (and hence encountered by
/// the clients of the library) should be members of this enum. Every failure
/// aborts the run that raised it; no partial layout is ever handed out
/// alongside an error.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// Errors that come from filtering the declaration graph.
    #[error(transparent)]
    Reachability(#[from] reachability::Error),

    /// Errors from the storage layout computation.
    #[error(transparent)]
    Packing(#[from] packing::Error),

    /// Errors from enriching a layout with on-chain slot values.
    #[error(transparent)]
    Enrichment(#[from] enrichment::Error),

    /// An unknown error, represented as a string.
    #[error("Unknown Error: {_0:?}")]
    Other(String),
}

impl Error {
    /// Constructs an unknown error with the provided `message`.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
