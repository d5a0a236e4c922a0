//! This module is an integration test that tests the layout of struct-typed
//! fields and the struct objects they link to.
#![cfg(test)]

use storage_layout_resolver as slr;
use storage_layout_resolver::{
    declaration::AssociationKind,
    layout::{StorageKind, StorageObjectId},
};

mod common;

#[test]
fn struct_fields_link_to_a_packed_struct_object() -> anyhow::Result<()> {
    let declarations = common::set_of(vec![
        common::contract("Bank")
            .with_association("Account", AssociationKind::FieldType)
            .with_field(common::user_defined("treasury", "Account"))
            .with_field(common::elementary("open", "bool")),
        common::structure("Account")
            .with_field(common::elementary("balance", "uint128"))
            .with_field(common::elementary("nonce", "uint128"))
            .with_field(common::elementary("frozen", "bool")),
    ]);

    let layout = common::resolve(declarations, "Bank")?;
    let root = layout.root().unwrap();

    // The struct rounds to two whole slots within the contract
    let treasury = root.assignment_for("treasury").unwrap();
    assert_eq!(treasury.from_slot, 0);
    assert_eq!(treasury.to_slot, 1);
    assert_eq!(treasury.byte_size, 64);
    assert!(root.has_assignment("open", 2, 0, 1));

    // The struct's own object packs its members from a fresh slot zero
    let account = layout.find_object("Account").unwrap();
    assert_eq!(account.kind, StorageKind::Struct);
    assert_eq!(treasury.struct_object, Some(account.id));
    assert!(account.has_assignment("balance", 0, 0, 16));
    assert!(account.has_assignment("nonce", 0, 16, 16));
    assert!(account.has_assignment("frozen", 1, 0, 1));

    Ok(())
}

#[test]
fn every_reference_shares_one_struct_object() -> anyhow::Result<()> {
    let declarations = common::set_of(vec![
        common::contract("Ledger")
            .with_association("Entry", AssociationKind::FieldType)
            .with_field(common::user_defined("latest", "Entry"))
            .with_field(common::array("history", "Entry[2]"))
            .with_field(common::mapping("entries", "mapping(address=>Entry)")),
        common::structure("Entry")
            .with_field(common::elementary("amount", "uint256"))
            .with_field(common::elementary("at", "uint64")),
    ]);

    let layout = common::resolve(declarations, "Ledger")?;
    let root = layout.root().unwrap();

    // One object serves the plain field, the array, and the mapping value
    assert_eq!(layout.object_count(), 2);
    let entry = layout.find_object("Entry").unwrap();
    for variable in ["latest", "history", "entries"] {
        let assignment = root.assignment_for(variable).unwrap();
        assert_eq!(assignment.struct_object, Some(entry.id));
    }

    // Entry sizes to 64 bytes, so the two-element array spans four slots
    assert!(root.has_assignment("latest", 0, 0, 64));
    assert!(root.has_assignment("history", 2, 0, 128));
    assert!(root.has_assignment("entries", 6, 0, 32));

    Ok(())
}

#[test]
fn nested_structs_are_laid_out_depth_first() -> anyhow::Result<()> {
    let declarations = common::set_of(vec![
        common::contract("Top")
            .with_association("Outer", AssociationKind::FieldType)
            .with_field(common::user_defined("outer", "Outer")),
        common::structure("Outer")
            .with_association("Inner", AssociationKind::FieldType)
            .with_field(common::elementary("tag", "uint8"))
            .with_field(common::user_defined("inner", "Inner"))
            .with_field(common::elementary("suffix", "uint8")),
        common::structure("Inner").with_field(common::elementary("word", "uint64")),
    ]);

    let layout = common::resolve(declarations, "Top")?;

    // Identifiers follow first-encounter order from the root
    let names: Vec<&str> = layout
        .objects()
        .iter()
        .map(|object| object.name.as_str())
        .collect();
    assert_eq!(names, vec!["Top", "Outer", "Inner"]);
    let ids: Vec<StorageObjectId> = layout.objects().iter().map(|object| object.id).collect();
    assert_eq!(
        ids,
        vec![StorageObjectId(1), StorageObjectId(2), StorageObjectId(3)]
    );

    // The nested struct member starts on a slot boundary inside Outer
    let outer = layout.find_object("Outer").unwrap();
    assert!(outer.has_assignment("tag", 0, 0, 1));
    assert!(outer.has_assignment("inner", 1, 0, 32));
    assert!(outer.has_assignment("suffix", 2, 0, 1));

    let inner = layout.find_object("Inner").unwrap();
    assert_eq!(outer.assignment_for("inner").unwrap().struct_object, Some(inner.id));
    assert!(inner.has_assignment("word", 0, 0, 8));

    Ok(())
}

#[test]
fn qualified_references_fall_back_to_the_unqualified_name() -> anyhow::Result<()> {
    let declarations = common::set_of(vec![
        common::contract("Pool")
            .with_association("Positions.Entry", AssociationKind::FieldType)
            .with_field(common::user_defined("position", "Positions.Entry"))
            .with_field(common::user_defined("pending", "Entry")),
        common::structure("Entry").with_field(common::elementary("size", "uint256")),
    ]);

    let layout = common::resolve(declarations, "Pool")?;
    let root = layout.root().unwrap();

    // Both spellings resolve to the same struct object
    assert_eq!(layout.object_count(), 2);
    let entry = layout.find_object("Entry").unwrap();
    assert_eq!(
        root.assignment_for("position").unwrap().struct_object,
        Some(entry.id)
    );
    assert_eq!(
        root.assignment_for("pending").unwrap().struct_object,
        Some(entry.id)
    );

    Ok(())
}

#[test]
fn self_referential_structs_resolve_to_their_own_object() -> anyhow::Result<()> {
    let declarations = common::set_of(vec![
        common::contract("List")
            .with_association("Node", AssociationKind::FieldType)
            .with_field(common::user_defined("head", "Node")),
        common::structure("Node")
            .with_association("Node", AssociationKind::FieldType)
            .with_field(common::elementary("value", "uint256"))
            .with_field(common::mapping("next", "mapping(uint256=>Node)")),
    ]);

    let layout = common::resolve(declarations, "List")?;

    let node = layout.find_object("Node").unwrap();
    assert!(node.has_assignment("value", 0, 0, 32));
    assert!(node.has_assignment("next", 1, 0, 32));
    assert_eq!(
        node.assignment_for("next").unwrap().struct_object,
        Some(node.id)
    );

    Ok(())
}

#[test]
fn fields_of_undeclared_types_cannot_be_sized() {
    let declarations = common::set_of(vec![common::contract("Broken")
        .with_field(common::user_defined("ghost", "Ghost"))]);

    let error = slr::new(declarations, "Broken", slr::resolver::Config::default())
        .resolve()
        .unwrap_err();
    assert_eq!(
        error,
        slr::error::Error::Packing(slr::error::packing::Error::MissingUserDefinedType {
            name: "Ghost".to_owned(),
        })
    );
}

#[test]
fn mapping_values_must_resolve_when_they_name_a_type() {
    // The mapping itself sizes to one slot, so the failure comes from the
    // struct-object resolution step instead
    let declarations = common::set_of(vec![common::contract("Broken")
        .with_field(common::mapping("entries", "mapping(uint256=>Phantom)"))]);

    let error = slr::new(declarations, "Broken", slr::resolver::Config::default())
        .resolve()
        .unwrap_err();
    assert_eq!(
        error,
        slr::error::Error::Packing(slr::error::packing::Error::UnresolvedUserType {
            name: "Phantom".to_owned(),
        })
    );
}
