//! This module contains common utilities for simplifying the writing of
//! integration tests for this library.

#![cfg(test)]

use storage_layout_resolver as slr;
use storage_layout_resolver::{
    declaration::{Declaration, DeclarationSet, Field, Stereotype, TypeKind},
    layout::StorageLayout,
    resolver::Config,
};

/// Constructs a new contract declaration named `name`.
///
/// The declaration's identifier is a placeholder; [`set_of`] assigns the real
/// one when the declaration set is built.
#[allow(unused)] // It is actually
pub fn contract(name: &str) -> Declaration {
    Declaration::new(0, name, Stereotype::Contract)
}

/// Constructs a new struct declaration named `name`.
#[allow(unused)] // It is actually
pub fn structure(name: &str) -> Declaration {
    Declaration::new(0, name, Stereotype::Struct)
}

/// Constructs a new enum declaration named `name`.
#[allow(unused)] // It is actually
pub fn enumeration(name: &str) -> Declaration {
    Declaration::new(0, name, Stereotype::Enum)
}

/// Constructs a new interface declaration named `name`.
#[allow(unused)] // It is actually
pub fn interface(name: &str) -> Declaration {
    Declaration::new(0, name, Stereotype::Interface)
}

/// Constructs a new library declaration named `name`.
#[allow(unused)] // It is actually
pub fn library(name: &str) -> Declaration {
    Declaration::new(0, name, Stereotype::Library)
}

/// Constructs a field named `name` of the elementary type `typ`.
#[allow(unused)] // It is actually
pub fn elementary(name: &str, typ: &str) -> Field {
    Field::new(name, typ, TypeKind::Elementary)
}

/// Constructs a field named `name` of the user-defined type `typ`.
#[allow(unused)] // It is actually
pub fn user_defined(name: &str, typ: &str) -> Field {
    Field::new(name, typ, TypeKind::UserDefined)
}

/// Constructs a field named `name` of the array type described by `typ`.
#[allow(unused)] // It is actually
pub fn array(name: &str, typ: &str) -> Field {
    Field::new(name, typ, TypeKind::Array)
}

/// Constructs a field named `name` of the mapping type described by `typ`.
#[allow(unused)] // It is actually
pub fn mapping(name: &str, typ: &str) -> Field {
    Field::new(name, typ, TypeKind::Mapping)
}

/// Builds a declaration set from `declarations`, assigning each declaration
/// its positional identifier.
#[allow(unused)] // It is actually
pub fn set_of(declarations: Vec<Declaration>) -> DeclarationSet {
    declarations
        .into_iter()
        .enumerate()
        .map(|(id, mut declaration)| {
            declaration.id = id;
            declaration
        })
        .collect()
}

/// Resolves the storage layout of the contract named `root` over
/// `declarations`.
///
/// It uses the default configuration for the resolver.
#[allow(unused)] // It is actually
pub fn resolve(declarations: DeclarationSet, root: &str) -> anyhow::Result<StorageLayout> {
    let layout = slr::new(declarations, root, Config::default()).resolve()?;
    Ok(layout)
}
