//! This module contains the definition of the resolver itself.

pub mod state;

use crate::{
    declaration::DeclarationSet,
    error,
    layout::StorageLayout,
    packing,
    reachability,
    resolver::state::State,
    utility::Address,
};

/// Creates a new resolver wrapping the provided `declarations`, analyzing the
/// contract named `root`, and with the provided `config`.
#[must_use]
pub fn new(
    declarations: DeclarationSet,
    root: impl Into<String>,
    config: Config,
) -> Resolver<state::HasDeclarations> {
    let root = root.into();
    let state = state::HasDeclarations {
        declarations,
        config,
    };
    Resolver { root, state }
}

/// The configuration for the resolver pipeline.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// The maximum association distance from the root contract at which
    /// declarations are still considered part of the analysis, with [`None`]
    /// placing no bound.
    pub reachability_depth: Option<usize>,

    /// The address the analyzed contract is deployed at, when the analysis
    /// target is a deployed contract rather than bare source.
    pub contract_address: Option<Address>,
}

impl Config {
    /// Bounds the reachability filter to `depth` associations from the root
    /// contract.
    #[must_use]
    pub fn with_reachability_depth(mut self, depth: usize) -> Self {
        self.reachability_depth = Some(depth);
        self
    }

    /// Records the address the analyzed contract is deployed at, to be
    /// stamped onto the computed layout's root object.
    #[must_use]
    pub fn with_contract_address(mut self, address: Address) -> Self {
        self.contract_address = Some(address);
        self
    }
}

/// The core of the storage layout analysis, the `Resolver` is responsible for
/// ingesting a declaration set and outputting a storage layout.
///
/// # Enforcing Valid State Transitions
///
/// The resolver enforces that only correct state transitions can occur
/// through use of structs that implement the exact state required by it at
/// any given point.
///
/// There is the [`Self::state`] function that provides access to the state
/// data of whichever state the resolver is currently in.
pub struct Resolver<S: State> {
    /// The name of the root contract being analyzed.
    root: String,

    /// The internal state of the resolver.
    state: S,
}

/// The safe operations available in all states.
///
/// # Modifying the Resolver
///
/// If you feel the need to modify the resolver outside of the standard
/// transitions, perhaps as part of external extensions to the library, you
/// will need to use one of the following functions:
///
/// - [`Resolver::set_root`]
/// - [`Resolver::state_mut`]
/// - [`Resolver::set_state`]
/// - [`Resolver::transform_state`]
///
/// All of these are unsafe as they allow violating the invariants of the
/// resolver's state. Be very careful and be sure that you know what you are
/// doing if you reach for these.
impl<S: State> Resolver<S> {
    /// Gets the name of the root contract being analyzed.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Gets an immutable reference to the current state of the resolver.
    pub fn state(&self) -> &S {
        &self.state
    }
}

/// Unsafe operations available in all states.
///
/// These operations are capable of **violating the state invariants** of the
/// resolver, and must be used with the _utmost_ care.
impl<S: State> Resolver<S> {
    /// Sets the name of the root contract being analyzed to `root`.
    ///
    /// # Safety
    ///
    /// Do not change the root contract under analysis unless you totally
    /// understand the state that the resolver is in, and the implications of
    /// doing so.
    pub unsafe fn set_root(&mut self, root: impl Into<String>) {
        self.root = root.into();
    }

    /// Gets a mutable reference to the current state of the resolver.
    ///
    /// # Safety
    ///
    /// Do not mutate the state instance unless you totally understand the
    /// state that the resolver is in, and the implications of doing so.
    pub unsafe fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Forces the resolver into `new_state`, disregarding any safety with
    /// regards to state transitions.
    ///
    /// # Safety
    ///
    /// Do not force a state transition for the resolver unless you totally
    /// understand the state that the resolver is in, and the implications of
    /// doing so.
    pub unsafe fn set_state<NS: State>(self, new_state: NS) -> Resolver<NS> {
        Resolver {
            root: self.root,
            state: new_state,
        }
    }

    /// Forces the resolver into the state `NS`, with the value of the state
    /// created by applying `transform` to the resolver's current state and
    /// disregarding any safety with regard to state transitions.
    ///
    /// # Safety
    ///
    /// Do not force a state transition for the resolver unless you totally
    /// understand the state that the resolver is in, and the implications of
    /// doing so.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the provided `transform` returns [`Err`].
    pub unsafe fn transform_state<NS: State>(
        self,
        transform: impl FnOnce(S) -> error::Result<NS>,
    ) -> error::Result<Resolver<NS>> {
        let state = transform(self.state)?;
        let root = self.root;

        Ok(Resolver { root, state })
    }
}

/// A type that allows the user to easily name the initial state of the
/// resolver.
pub type InitialResolver = Resolver<state::HasDeclarations>;

/// Operations available on a newly-created resolver.
impl Resolver<state::HasDeclarations> {
    /// Executes the analysis process from beginning to end, performing all
    /// the intermediate steps automatically and returning the storage layout.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if any step in the process fails.
    pub fn resolve(self) -> error::Result<StorageLayout> {
        let resolver = self.filter()?;
        let resolver = resolver.pack()?;

        Ok(resolver.layout().clone())
    }

    /// Filters the declaration set down to the declarations connected to the
    /// root contract within the configured reachability depth.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the root contract is not in the declaration set.
    pub fn filter(self) -> error::Result<Resolver<state::FilterComplete>> {
        let root = self.root.clone();
        unsafe {
            self.transform_state(|old_state| {
                let reachable = reachability::connected_to_roots(
                    &old_state.declarations,
                    &[root.as_str()],
                    old_state.config.reachability_depth,
                )?;
                let config = old_state.config;
                Ok(state::FilterComplete { reachable, config })
            })
        }
    }
}

/// Operations available on a resolver that has filtered its declarations.
impl Resolver<state::FilterComplete> {
    /// Packs the reachable declarations' fields into storage slots, producing
    /// the layout for the root contract and every struct it references.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if any field reached from the root contract cannot be
    /// sized or resolved.
    pub fn pack(self) -> error::Result<Resolver<state::LayoutComplete>> {
        let root = self.root.clone();
        unsafe {
            self.transform_state(|old_state| {
                let layout = packing::compute(
                    &root,
                    &old_state.reachable,
                    old_state.config.contract_address,
                )?;
                Ok(state::LayoutComplete { layout })
            })
        }
    }
}

/// Operations available on a resolver that has computed its storage layout.
impl Resolver<state::LayoutComplete> {
    /// Gets the computed storage layout for the contract.
    #[must_use]
    pub fn layout(&self) -> &StorageLayout {
        &self.state.layout
    }
}
