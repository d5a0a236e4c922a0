//! This library computes the [storage layout](https://docs.soliditylang.org/en/latest/internals/layout_in_storage.html)
//! of a smart contract—namely, which slot, and which bytes within that slot,
//! each declared variable occupies—from declarations extracted from the
//! contract's source.
//!
//! Note that this is a declaration-level model: mappings and dynamically
//! sized arrays occupy their single marker slot, and the hashed locations of
//! their contents are not computed here.
//!
//! # How it Works
//!
//! From a very high level, the layout resolution process is performed as
//! follows:
//!
//! 1. Declarations (contracts, structs, enums, interfaces and libraries,
//!    together with their fields, constants and the associations between
//!    them) are ingested as a [`declaration::DeclarationSet`].
//! 2. The [`reachability`] filter treats the associations as a directed
//!    graph and trims the set down to the declarations connected to the root
//!    contract within a configurable association depth.
//! 3. The [`packing`] engine flattens the root's inheritance tree, sizes
//!    every surviving field, and packs the fields greedily into 32-byte
//!    slots exactly as declaration order permits. Every struct reached from
//!    a field is laid out once as its own [`layout::StorageObject`].
//! 4. Optionally, [`enrichment`] reads the value held in each assigned slot
//!    through a client-provided [`enrichment::SlotValueSource`] and writes
//!    the values back onto the layout.
//!
//! # Basic Usage
//!
//! For the most basic usage of the library, it is sufficient to construct a
//! `Resolver` and call the `.resolve` method, passing your declarations.
//!
//! ```
//! use storage_layout_resolver as slr;
//! use storage_layout_resolver::{
//!     declaration::{Declaration, Field, Stereotype, TypeKind},
//!     resolver,
//! };
//!
//! let declarations = vec![Declaration::new(0, "Wallet", Stereotype::Contract)
//!     .with_field(Field::new("paused", "bool", TypeKind::Elementary))
//!     .with_field(Field::new("owner", "address", TypeKind::Elementary))
//!     .with_field(Field::new("balance", "uint256", TypeKind::Elementary))]
//! .into();
//!
//! let layout = slr::new(declarations, "Wallet", resolver::Config::default())
//!     .resolve()
//!     .unwrap();
//!
//! let root = layout.root().unwrap();
//! assert!(root.has_assignment("paused", 0, 0, 1));
//! assert!(root.has_assignment("owner", 0, 1, 20));
//! assert!(root.has_assignment("balance", 1, 0, 32));
//! ```

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming

pub mod constant;
pub mod declaration;
pub mod descriptor;
pub mod enrichment;
pub mod error;
pub mod layout;
pub mod packing;
pub mod reachability;
pub mod resolver;
pub mod utility;

// Re-exports to provide the library interface.
pub use layout::StorageLayout;
pub use resolver::new;
