//! This module contains the definitions for the storage layout representation
//! types.

use serde::{Deserialize, Serialize};

use crate::utility::{Address, U256Wrapper};

/// The identifier of a [`StorageObject`] within one resolver run.
///
/// Identifiers are assigned from 1 upward in the order the objects are first
/// encountered, so they are unique within a run but carry no meaning across
/// runs.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct StorageObjectId(pub usize);

/// The identifier of a [`StorageSlotAssignment`] within one resolver run.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct AssignmentId(pub usize);

/// The kind of declaration that a [`StorageObject`] lays out.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum StorageKind {
    /// The root contract being analyzed.
    Contract,

    /// A struct reached from the root contract's fields.
    Struct,
}

/// The complete storage layout computed for a root contract.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StorageLayout {
    objects: Vec<StorageObject>,
}

impl StorageLayout {
    /// Adds `object` to the storage layout.
    pub fn add(&mut self, object: StorageObject) {
        self.objects.push(object);
    }

    /// Gets the storage objects that make up this layout.
    ///
    /// The first object is always the root contract; the rest are the struct
    /// objects it transitively references, in the order they were first
    /// encountered. The order is never changed after computation.
    #[must_use]
    pub fn objects(&self) -> &Vec<StorageObject> {
        &self.objects
    }

    /// Gets mutable access to the storage objects that make up this layout.
    ///
    /// This exists so that slot values and addresses can be written onto a
    /// computed layout; the slot arithmetic itself should never be revised
    /// after computation.
    pub fn objects_mut(&mut self) -> &mut Vec<StorageObject> {
        &mut self.objects
    }

    /// Gets the root contract's storage object.
    ///
    /// This is [`None`] only for an empty layout, which the resolver never
    /// produces.
    #[must_use]
    pub fn root(&self) -> Option<&StorageObject> {
        self.objects.first()
    }

    /// Gets mutable access to the root contract's storage object.
    pub fn root_mut(&mut self) -> Option<&mut StorageObject> {
        self.objects.first_mut()
    }
}

/// Additional utility functions to enable cleaner testing with the storage
/// layout.
impl StorageLayout {
    /// Gets the object with the provided `id`, if it exists in the layout.
    #[must_use]
    pub fn object(&self, id: StorageObjectId) -> Option<&StorageObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    /// Gets the first object named `name`, if one exists in the layout.
    #[must_use]
    pub fn find_object(&self, name: &str) -> Option<&StorageObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    /// Gets the number of objects in the storage layout.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Checks if the storage layout is empty (has no objects).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        let objects = Vec::new();
        Self { objects }
    }
}

/// The laid-out storage of a single declaration: the root contract, or one of
/// the structs its fields reach.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StorageObject {
    /// The object's identifier within the run.
    pub id: StorageObjectId,

    /// The name of the declaration the object lays out.
    pub name: String,

    /// Whether the object lays out the root contract or a struct.
    pub kind: StorageKind,

    /// The object's slot assignments, in field order.
    pub assignments: Vec<StorageSlotAssignment>,

    /// The network address of the analyzed contract.
    ///
    /// Only ever present on the root object, and only when the analysis
    /// target was a deployed contract rather than source code.
    pub address: Option<Address>,
}

impl StorageObject {
    /// Constructs a new storage object with no assignments.
    #[must_use]
    pub fn new(id: StorageObjectId, name: impl Into<String>, kind: StorageKind) -> Self {
        let name = name.into();
        Self {
            id,
            name,
            kind,
            assignments: Vec::new(),
            address: None,
        }
    }
}

/// Additional utility functions to enable cleaner testing with storage
/// objects.
impl StorageObject {
    /// Gets the assignment for the variable named `variable`, if one exists.
    #[must_use]
    pub fn assignment_for(&self, variable: &str) -> Option<&StorageSlotAssignment> {
        self.assignments
            .iter()
            .find(|assignment| assignment.variable == variable)
    }

    /// Checks that the variable named `variable` was placed at `from_slot`
    /// with the provided `byte_offset` and `byte_size`.
    #[must_use]
    pub fn has_assignment(
        &self,
        variable: &str,
        from_slot: u64,
        byte_offset: usize,
        byte_size: usize,
    ) -> bool {
        self.assignment_for(variable).is_some_and(|assignment| {
            assignment.from_slot == from_slot
                && assignment.byte_offset == byte_offset
                && assignment.byte_size == byte_size
        })
    }
}

/// The placement of a single field within its declaration's storage.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StorageSlotAssignment {
    /// The assignment's identifier within the run.
    pub id: AssignmentId,

    /// The first slot the field occupies.
    pub from_slot: u64,

    /// The last slot the field occupies.
    ///
    /// Equal to [`Self::from_slot`] unless the field spans multiple slots.
    pub to_slot: u64,

    /// The number of bytes the field occupies.
    pub byte_size: usize,

    /// The byte offset of the field within its first slot.
    ///
    /// This is 0 except for fields packed after another field in the same
    /// slot.
    pub byte_offset: usize,

    /// The field's raw type descriptor.
    #[serde(rename = "type")]
    pub typ: String,

    /// The name of the field.
    pub variable: String,

    /// The name of the declaration the field belongs to.
    ///
    /// Under inheritance this is the ancestor that declared the field, not
    /// the root contract.
    pub contract_name: String,

    /// The object laying out the field's struct type, when the field is a
    /// struct, or an array or mapping over one.
    pub struct_object: Option<StorageObjectId>,

    /// The raw value held in [`Self::from_slot`] on the network.
    ///
    /// Only present after enrichment against a deployed contract.
    pub value: Option<U256Wrapper>,
}
