//! This module contains the storage layout engine: the recursive walk that
//! turns a declaration and its inheritance tree into slot assignments, and
//! the registry of struct storage objects discovered along the way.
//!
//! Slot placement is a greedy left-to-right packing with no reordering:
//! fields occupy slots exactly as declaration order permits. Every lookup
//! failure aborts the whole computation rather than producing a layout with
//! silently wrong slot numbers.

pub mod size;

use tracing::{debug, trace};

use crate::{
    constant::SLOT_SIZE_BYTES,
    declaration::{dotted_suffix, Declaration, DeclarationSet, Field, Stereotype, TypeKind},
    descriptor,
    error::packing::{Error, Result},
    layout::{
        AssignmentId,
        StorageKind,
        StorageLayout,
        StorageObject,
        StorageObjectId,
        StorageSlotAssignment,
    },
    utility::Address,
};

/// Computes the storage layout for the contract named `root_name`.
///
/// The returned layout's first object lays out the root contract itself; the
/// struct objects its fields transitively reference follow in the order they
/// were first encountered. `address` is stamped onto the root object when the
/// analysis target was a deployed contract.
///
/// # Errors
///
/// Returns [`Err`] if `root_name` does not name a declaration in the set, or
/// if any field reached from the root cannot be sized or resolved.
pub fn compute(
    root_name: &str,
    declarations: &DeclarationSet,
    address: Option<Address>,
) -> Result<StorageLayout> {
    let root = declarations.find(root_name).ok_or_else(|| Error::RootNotFound {
        name: root_name.to_string(),
    })?;

    let mut store = ObjectStore::new();
    let root_id = store.allocate_object();
    let mut root_object = StorageObject::new(root_id, root_name, StorageKind::Contract);
    root_object.address = address;
    store.register(root_object);

    let mut assignments = Vec::new();
    let mut visited_ancestors = Vec::new();
    layout_fields(
        root,
        declarations,
        &mut assignments,
        &mut store,
        &mut visited_ancestors,
    )?;
    store.fill(root_id, assignments);

    debug!(
        root = root_name,
        objects = store.objects.len(),
        "Computed the storage layout"
    );

    let mut layout = StorageLayout::default();
    for object in store.objects {
        layout.add(object);
    }

    Ok(layout)
}

/// Appends the slot assignments for `declaration`'s inherited and own fields
/// to `assignments`.
///
/// Inherited fields land first, walking the parents depth first in the order
/// they are declared; `visited_ancestors` carries the ancestors already laid
/// out so that each distinct ancestor in a diamond contributes its fields
/// exactly once. Fields marked constant occupy no storage and produce no
/// assignment.
fn layout_fields(
    declaration: &Declaration,
    declarations: &DeclarationSet,
    assignments: &mut Vec<StorageSlotAssignment>,
    store: &mut ObjectStore,
    visited_ancestors: &mut Vec<String>,
) -> Result<()> {
    // All new parents are marked visited before any of them is walked. Under
    // diamond inheritance this decides which path contributes the shared
    // ancestor, so the order of these two steps is load-bearing.
    let new_parents: Vec<String> = declaration
        .parents()
        .map(|parent| parent.target.clone())
        .filter(|parent| !visited_ancestors.contains(parent))
        .collect();
    visited_ancestors.extend(new_parents.iter().cloned());

    for parent in &new_parents {
        let parent_declaration = declarations.resolve(parent).ok_or_else(|| {
            Error::MissingParentDeclaration {
                parent: parent.clone(),
                child: declaration.name.clone(),
            }
        })?;
        layout_fields(
            parent_declaration,
            declarations,
            assignments,
            store,
            visited_ancestors,
        )?;
    }

    for field in &declaration.fields {
        if field.is_constant {
            continue;
        }

        let byte_size = size::field_byte_size(field, declaration, declarations)?;
        let struct_object = resolve_struct_object(field, declarations, store)?;

        let (last_to_slot, next_offset) = assignments
            .last()
            .map_or((0, 0), |last| (last.to_slot, last.byte_offset + last.byte_size));

        let assignment = if next_offset + byte_size > SLOT_SIZE_BYTES {
            let from_slot = if assignments.is_empty() {
                0
            } else {
                last_to_slot + 1
            };
            let spanned_slots = (byte_size.saturating_sub(1) / SLOT_SIZE_BYTES) as u64;
            StorageSlotAssignment {
                id: store.allocate_assignment(),
                from_slot,
                to_slot: from_slot + spanned_slots,
                byte_size,
                byte_offset: 0,
                typ: field.typ.clone(),
                variable: field.name.clone(),
                contract_name: declaration.name.clone(),
                struct_object,
                value: None,
            }
        } else {
            StorageSlotAssignment {
                id: store.allocate_assignment(),
                from_slot: last_to_slot,
                to_slot: last_to_slot,
                byte_size,
                byte_offset: next_offset,
                typ: field.typ.clone(),
                variable: field.name.clone(),
                contract_name: declaration.name.clone(),
                struct_object,
                value: None,
            }
        };

        trace!(
            variable = field.name.as_str(),
            from_slot = assignment.from_slot,
            byte_offset = assignment.byte_offset,
            byte_size,
            "Placed a storage field"
        );
        assignments.push(assignment);
    }

    Ok(())
}

/// Resolves the struct storage object that `field` references, creating and
/// laying the struct out on first encounter.
///
/// Struct-typed fields, and mappings and arrays whose element type resolves
/// to a struct, link their assignment to the object laying that struct out.
/// Objects are memoized per declaration, so every field referencing the same
/// struct shares one object. Enum and contract-like references need no
/// object, and neither do containers of elementary types.
///
/// # Errors
///
/// Returns [`Err`] if the referenced user-defined type name resolves to no
/// declaration.
fn resolve_struct_object(
    field: &Field,
    declarations: &DeclarationSet,
    store: &mut ObjectStore,
) -> Result<Option<StorageObjectId>> {
    let referenced = match field.kind {
        TypeKind::UserDefined => Some(field.typ.clone()),
        TypeKind::Array => descriptor::parse_array(&field.typ).map(|array| array.element),
        TypeKind::Mapping => descriptor::mapping_value_type(&field.typ).map(str::to_string),
        TypeKind::Elementary | TypeKind::Function => None,
    };
    let Some(referenced) = referenced else {
        return Ok(None);
    };
    if field.kind != TypeKind::UserDefined && descriptor::is_elementary(&referenced) {
        return Ok(None);
    }

    if let Some(existing) = store.find_struct(&referenced) {
        return Ok(Some(existing));
    }

    let Some(declaration) = declarations.resolve(&referenced) else {
        return Err(Error::UnresolvedUserType { name: referenced });
    };
    if declaration.stereotype != Stereotype::Struct {
        return Ok(None);
    }

    // Registered before descending so that a struct reaching itself through
    // a mapping or array finds the in-progress object instead of recursing
    // forever.
    let id = store.allocate_object();
    store.register(StorageObject::new(
        id,
        declaration.name.clone(),
        StorageKind::Struct,
    ));

    let mut assignments = Vec::new();
    let mut visited_ancestors = Vec::new();
    layout_fields(
        declaration,
        declarations,
        &mut assignments,
        store,
        &mut visited_ancestors,
    )?;
    store.fill(id, assignments);

    Ok(Some(id))
}

/// The per-run context for one layout computation.
///
/// The store owns the storage objects created so far and allocates all
/// object and assignment identifiers, both counting from 1 in first-
/// encounter order. Scoping the counters here keeps concurrent and repeated
/// computations independent of each other.
#[derive(Debug)]
struct ObjectStore {
    objects: Vec<StorageObject>,
    next_object: usize,
    next_assignment: usize,
}

impl ObjectStore {
    /// Constructs a new, empty store.
    fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_object: 1,
            next_assignment: 1,
        }
    }

    /// Allocates the identifier for the next storage object.
    fn allocate_object(&mut self) -> StorageObjectId {
        let id = StorageObjectId(self.next_object);
        self.next_object += 1;
        id
    }

    /// Allocates the identifier for the next slot assignment.
    fn allocate_assignment(&mut self) -> AssignmentId {
        let id = AssignmentId(self.next_assignment);
        self.next_assignment += 1;
        id
    }

    /// Registers `object` in the store.
    fn register(&mut self, object: StorageObject) {
        self.objects.push(object);
    }

    /// Finds the registered struct object for the type reference `name`, by
    /// exact name first and dotted suffix second.
    ///
    /// The root contract object never participates in this lookup.
    fn find_struct(&self, name: &str) -> Option<StorageObjectId> {
        let find = |wanted: &str| {
            self.objects
                .iter()
                .find(|object| object.kind == StorageKind::Struct && object.name == wanted)
                .map(|object| object.id)
        };

        find(name).or_else(|| dotted_suffix(name).and_then(find))
    }

    /// Writes `assignments` onto the registered object `id`.
    fn fill(&mut self, id: StorageObjectId, assignments: Vec<StorageSlotAssignment>) {
        if let Some(object) = self.objects.iter_mut().find(|object| object.id == id) {
            object.assignments = assignments;
        }
    }
}
