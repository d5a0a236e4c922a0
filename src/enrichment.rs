//! This module contains the boundary through which a computed layout is
//! enriched with the raw values held by a deployed contract's storage slots.
//!
//! The crate itself never talks to the network. Clients hand in an
//! implementation of [`SlotValueSource`] wrapping whatever transport they
//! use, and the enrichment step batches the slot reads through it and writes
//! the answers back onto the layout. Enrichment is optional and strictly
//! additive: the slot arithmetic of a layout is never revised here.

use std::{collections::HashMap, fmt::Debug, rc::Rc};

use tracing::debug;

use crate::{
    error::enrichment::{Error, Result},
    layout::StorageObject,
    utility::{Address, U256Wrapper},
};

/// A dynamically dispatched [`SlotValueSource`] instance.
pub type DynSlotValueSource = Rc<dyn SlotValueSource>;

/// The interface to an object that can read raw storage slot values for a
/// deployed contract.
///
/// The interface is a single batched read, but it can encapsulate arbitrary
/// transports as far as this crate is concerned: a JSON-RPC node, a local
/// fork, or a fixture table in tests.
pub trait SlotValueSource
where
    Self: Debug,
{
    /// Reads the value of each of the `slots` of the contract deployed at
    /// `address`, as of the historical block `block` or the latest block when
    /// none is given.
    ///
    /// The returned values must align index-for-index with `slots`,
    /// duplicates included.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the values cannot be read.
    fn slot_values(
        &self,
        address: &Address,
        slots: &[u64],
        block: Option<u64>,
    ) -> Result<Vec<U256Wrapper>>;
}

/// A [`SlotValueSource`] that answers from a fixed in-memory table, for tests
/// and offline analysis.
///
/// Slots absent from the table read as zero, mirroring uninitialized storage
/// on the network.
#[derive(Clone, Debug, Default)]
pub struct StaticSlotValues {
    values: HashMap<u64, U256Wrapper>,
}

impl StaticSlotValues {
    /// Constructs a new static source holding `values`.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = (u64, U256Wrapper)>) -> Self {
        let values = values.into_iter().collect();
        Self { values }
    }

    /// Adds a `value` for `slot` to the table.
    #[must_use]
    pub fn with_value(mut self, slot: u64, value: impl Into<U256Wrapper>) -> Self {
        self.values.insert(slot, value.into());
        self
    }

    /// Wraps the source into an [`Rc`].
    #[must_use]
    pub fn in_rc(self) -> Rc<dyn SlotValueSource> {
        Rc::new(self)
    }
}

impl SlotValueSource for StaticSlotValues {
    fn slot_values(
        &self,
        _address: &Address,
        slots: &[u64],
        _block: Option<u64>,
    ) -> Result<Vec<U256Wrapper>> {
        Ok(slots
            .iter()
            .map(|slot| self.values.get(slot).copied().unwrap_or_default())
            .collect())
    }
}

/// Writes the on-network values of `object`'s slots onto its assignments.
///
/// The first slot of every assignment is requested in assignment order,
/// duplicates included, as one batched read whose response aligns
/// index-for-index with the request. Only the `value` of each assignment is
/// written.
///
/// # Errors
///
/// Returns [`Err`] if the source fails, or if it answers with the wrong
/// number of values.
pub fn add_slot_values(
    object: &mut StorageObject,
    source: &dyn SlotValueSource,
    address: &Address,
    block: Option<u64>,
) -> Result<()> {
    let slots: Vec<u64> = object
        .assignments
        .iter()
        .map(|assignment| assignment.from_slot)
        .collect();

    let values = source.slot_values(address, &slots, block)?;
    if values.len() != slots.len() {
        return Err(Error::ValueCountMismatch {
            expected: slots.len(),
            actual: values.len(),
        });
    }

    for (assignment, value) in object.assignments.iter_mut().zip(values) {
        assignment.value = Some(value);
    }

    debug!(
        object = object.name.as_str(),
        slots = slots.len(),
        "Enriched a storage object with slot values"
    );

    Ok(())
}
