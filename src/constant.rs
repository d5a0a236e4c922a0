//! This module contains constants that are needed throughout the codebase.

/// The width of a storage slot on the EVM in bytes.
pub const SLOT_SIZE_BYTES: usize = 32;

/// The width of a byte on the EVM (and most other places) in bits.
pub const BYTE_SIZE_BITS: usize = 8;

/// The number of bytes a `bool` variable occupies in storage.
pub const BOOL_SIZE_BYTES: usize = 1;

/// The number of bytes an `address` variable occupies in storage.
pub const ADDRESS_SIZE_BYTES: usize = 20;

/// The number of bytes an enum variable occupies in storage.
///
/// Enums are stored as their smallest-fitting unsigned integer, and the model
/// here assumes no enum grows beyond 256 variants.
pub const ENUM_SIZE_BYTES: usize = 1;

/// The number of bytes a reference to a contract, interface or library
/// occupies in storage.
///
/// Such references are stored as the address of the referenced account.
pub const CONTRACT_REFERENCE_SIZE_BYTES: usize = ADDRESS_SIZE_BYTES;

/// The largest element size that is packed tightly within a fixed-size array.
///
/// Array elements larger than this threshold but smaller than a full slot are
/// padded out to [`SLOT_SIZE_BYTES`] so that no element straddles a slot
/// boundary.
pub const ARRAY_ELEMENT_PACKING_THRESHOLD_BYTES: usize = 16;
