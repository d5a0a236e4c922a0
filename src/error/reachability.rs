//! This module contains errors pertaining to filtering the declaration set
//! down to the declarations connected to one or more root contracts.

use thiserror::Error;

/// Errors that occur while filtering the declaration graph in
/// [`crate::reachability`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Failed to find base contract with name {name:?}")]
    RootNotFound { name: String },
}

/// The result type for methods that may have reachability errors.
pub type Result<T> = std::result::Result<T, Error>;
