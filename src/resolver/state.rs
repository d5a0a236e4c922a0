//! This module contains the state tracking functionality for the resolver.

use std::fmt::Debug;

use crate::{declaration::DeclarationSet, layout::StorageLayout, resolver::Config};

/// A marker trait that says that the type implementing it is a resolver
/// state.
///
/// Resolver states can be transitioned between as part of the
/// [`crate::resolver::Resolver`] state machine, and are intended to enforce
/// that correct state transitions take place.
pub trait State
where
    Self: Debug + Sized,
{
}

/// The initial state for the resolver.
#[derive(Debug)]
pub struct HasDeclarations {
    /// The declarations extracted from the contract source under analysis.
    pub declarations: DeclarationSet,

    /// The configuration for the resolver pipeline.
    pub config: Config,
}
impl State for HasDeclarations {}

/// The state for a resolver that has filtered its declarations down to the
/// ones connected to the root contract.
#[derive(Debug)]
pub struct FilterComplete {
    /// The declarations connected to the root contract within the configured
    /// reachability depth.
    pub reachable: DeclarationSet,

    /// The configuration for the resolver pipeline.
    pub config: Config,
}
impl State for FilterComplete {}

/// The resolver has computed the storage layout, and is now ready to provide
/// it.
#[derive(Debug)]
pub struct LayoutComplete {
    /// The computed storage layout.
    pub layout: StorageLayout,
}
impl State for LayoutComplete {}
