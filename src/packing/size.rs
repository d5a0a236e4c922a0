//! This module contains the byte-sizing rules for storage fields.
//!
//! Sizes are computed for a field embedded in a declaration: symbolic array
//! dimensions resolve against the constants of the declaration the field
//! lexically belongs to, which stays fixed through the recursion even as
//! sizing descends into struct members.

use crate::{
    constant::{
        ADDRESS_SIZE_BYTES,
        ARRAY_ELEMENT_PACKING_THRESHOLD_BYTES,
        BOOL_SIZE_BYTES,
        BYTE_SIZE_BITS,
        CONTRACT_REFERENCE_SIZE_BYTES,
        ENUM_SIZE_BYTES,
        SLOT_SIZE_BYTES,
    },
    declaration::{Declaration, DeclarationSet, Field, Stereotype, TypeKind},
    descriptor,
    descriptor::{Dimension, Elementary},
    error::packing::{Error, Result},
};

/// Computes the number of bytes that `field` occupies in storage.
///
/// `owner` is the declaration the field lexically belongs to; its constants
/// are the namespace for symbolic array dimensions.
///
/// # Errors
///
/// Returns [`Err`] if the field's type cannot be sized: an unrecognized
/// elementary name, a user-defined name that resolves to no declaration, a
/// fixed array dimension that resolves to no constant, or a declared size
/// too large for the machine to represent.
pub fn field_byte_size(
    field: &Field,
    owner: &Declaration,
    declarations: &DeclarationSet,
) -> Result<usize> {
    match field.kind {
        // Mappings and function types occupy exactly one slot.
        TypeKind::Mapping | TypeKind::Function => Ok(SLOT_SIZE_BYTES),
        TypeKind::Array => array_byte_size(&field.typ, owner, declarations),
        TypeKind::UserDefined => user_defined_byte_size(&field.typ, owner, declarations),
        TypeKind::Elementary => elementary_byte_size(&field.typ),
    }
}

/// Computes the byte size of the elementary type named `name`.
fn elementary_byte_size(name: &str) -> Result<usize> {
    let Some(parsed) = Elementary::parse(name) else {
        return Err(Error::UnsupportedElementaryType {
            name: name.to_string(),
        });
    };

    let bytes = match parsed {
        Elementary::Bool => BOOL_SIZE_BYTES,
        Elementary::Address => ADDRESS_SIZE_BYTES,
        Elementary::String
        | Elementary::Bytes
        | Elementary::UInt { bits: None }
        | Elementary::Int { bits: None }
        | Elementary::UFixed { bits: None }
        | Elementary::Fixed { bits: None } => SLOT_SIZE_BYTES,
        Elementary::UInt { bits: Some(bits) }
        | Elementary::Int { bits: Some(bits) }
        | Elementary::UFixed { bits: Some(bits) }
        | Elementary::Fixed { bits: Some(bits) } => bits as usize / BYTE_SIZE_BITS,
        Elementary::FixedBytes { bytes } => bytes as usize,
    };

    Ok(bytes)
}

/// Computes the byte size of an array field from its raw `descriptor`.
///
/// Any dynamic dimension makes the whole array dynamically sized, occupying a
/// single slot, and short-circuits before any constant resolution is
/// attempted. So does a descriptor whose element is not a plain type name,
/// such as an array of mappings.
fn array_byte_size(
    descriptor: &str,
    owner: &Declaration,
    declarations: &DeclarationSet,
) -> Result<usize> {
    let Some(parsed) = descriptor::parse_array(descriptor) else {
        return Ok(SLOT_SIZE_BYTES);
    };
    if parsed.is_dynamic() {
        return Ok(SLOT_SIZE_BYTES);
    }

    let mut dimensions = Vec::with_capacity(parsed.dimensions.len());
    for dimension in &parsed.dimensions {
        let count = match dimension {
            Dimension::Fixed(count) => *count,
            Dimension::Named(name) => owner.constant_value(name).ok_or_else(|| {
                Error::UnresolvableArrayDimension {
                    dimension: name.clone(),
                }
            })?,
            Dimension::Dynamic => return Ok(SLOT_SIZE_BYTES),
        };
        dimensions.push(count);
    }

    let mut element_size = if descriptor::is_elementary(&parsed.element) {
        elementary_byte_size(&parsed.element)?
    } else {
        user_defined_byte_size(&parsed.element, owner, declarations)?
    };

    // Anything over the packing threshold, like an address, takes a whole
    // slot per element.
    if element_size > ARRAY_ELEMENT_PACKING_THRESHOLD_BYTES && element_size < SLOT_SIZE_BYTES {
        element_size = SLOT_SIZE_BYTES;
    }

    // The first dimension packs into whole padded slots; outer dimensions
    // multiply the padded block without re-padding. A declared constant can
    // name a total beyond the addressable size.
    element_size
        .checked_mul(dimensions[0])
        .and_then(|bytes| bytes.checked_next_multiple_of(SLOT_SIZE_BYTES))
        .and_then(|slot_bytes| {
            dimensions[1..]
                .iter()
                .try_fold(slot_bytes, |bytes, count| bytes.checked_mul(*count))
        })
        .ok_or_else(|| Error::OversizedType {
            descriptor: descriptor.to_string(),
        })
}

/// Computes the byte size of a field typed by the user-defined type `name`.
fn user_defined_byte_size(
    name: &str,
    owner: &Declaration,
    declarations: &DeclarationSet,
) -> Result<usize> {
    let Some(declaration) = declarations.resolve(name) else {
        return Err(Error::MissingUserDefinedType {
            name: name.to_string(),
        });
    };

    match declaration.stereotype {
        Stereotype::Enum => Ok(ENUM_SIZE_BYTES),
        Stereotype::Contract
        | Stereotype::Abstract
        | Stereotype::Interface
        | Stereotype::Library => Ok(CONTRACT_REFERENCE_SIZE_BYTES),
        Stereotype::Struct => struct_byte_size(declaration, owner, declarations),
    }
}

/// Computes the total byte size of the struct laid out by `structure` when it
/// is embedded as a field.
///
/// The walk mirrors how the fields would pack into slots: arrays and nested
/// structs start on a slot boundary, every other member packs into the
/// remaining space of its slot when it fits, and the total rounds up to whole
/// slots.
fn struct_byte_size(
    structure: &Declaration,
    owner: &Declaration,
    declarations: &DeclarationSet,
) -> Result<usize> {
    let oversized = || Error::OversizedType {
        descriptor: structure.name.clone(),
    };
    let mut total = 0_usize;

    for member in &structure.fields {
        let starts_on_boundary = match member.kind {
            TypeKind::Array => true,
            TypeKind::UserDefined => {
                let Some(member_declaration) = declarations.resolve(&member.typ) else {
                    return Err(Error::MissingUserDefinedType {
                        name: member.typ.clone(),
                    });
                };
                member_declaration.stereotype == Stereotype::Struct
            }
            _ => false,
        };
        if starts_on_boundary {
            total = total
                .checked_next_multiple_of(SLOT_SIZE_BYTES)
                .ok_or_else(oversized)?;
        }

        let member_size = field_byte_size(member, owner, declarations)?;
        let end_of_current_slot = total
            .checked_next_multiple_of(SLOT_SIZE_BYTES)
            .ok_or_else(oversized)?;
        let space_left_in_slot = end_of_current_slot - total;
        if member_size <= space_left_in_slot {
            total += member_size;
        } else {
            total = end_of_current_slot
                .checked_add(member_size)
                .ok_or_else(oversized)?;
        }
    }

    total
        .checked_next_multiple_of(SLOT_SIZE_BYTES)
        .ok_or_else(oversized)
}
