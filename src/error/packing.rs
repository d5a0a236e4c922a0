//! This module contains errors pertaining to the storage layout computation
//! itself.
//!
//! All of these are raised eagerly: the first field that cannot be sized or
//! resolved aborts the entire layout rather than producing a partial result
//! with silently wrong slot numbers.

use thiserror::Error;

/// Errors that occur while computing a storage layout in [`crate::packing`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Failed to find contract with name {name:?}")]
    RootNotFound { name: String },

    #[error("Failed to find parent contract {parent:?} of {child:?}")]
    MissingParentDeclaration { parent: String, child: String },

    #[error("Failed to find user defined struct or enum {name:?}")]
    MissingUserDefinedType { name: String },

    #[error("Failed to find user defined type {name:?}")]
    UnresolvedUserType { name: String },

    #[error("Could not size fixed size array with dimension {dimension:?}")]
    UnresolvableArrayDimension { dimension: String },

    #[error("Fixed size of type {descriptor:?} is too large to compute")]
    OversizedType { descriptor: String },

    #[error("Failed to size elementary type {name:?}")]
    UnsupportedElementaryType { name: String },
}

/// The result type for methods that may have layout errors.
pub type Result<T> = std::result::Result<T, Error>;
