//! This module is an integration test that tests the library's layout
//! resolution on a very simple, hand-constructed, contract.
#![cfg(test)]

use storage_layout_resolver::layout::StorageLayout;

mod common;

#[test]
fn resolves_a_simple_contract() -> anyhow::Result<()> {
    // contract Token {
    //     bool    public paused;
    //     address public owner;
    //     uint256 public total_supply;
    //     mapping(address => uint256) public balances;
    //     string  public name;
    //     uint256 public constant CAP = 1_000_000;
    // }
    let declarations = common::set_of(vec![common::contract("Token")
        .with_field(common::elementary("paused", "bool"))
        .with_field(common::elementary("owner", "address"))
        .with_field(common::elementary("total_supply", "uint256"))
        .with_field(common::mapping("balances", "mapping(address=>uint256)"))
        .with_field(common::elementary("name", "string"))
        .with_field(common::elementary("CAP", "uint256").constant())]);

    // Get the final storage layout for the input contract
    let layout = common::resolve(declarations, "Token")?;

    // No structs are referenced, so the root contract is the only object
    assert_eq!(layout.object_count(), 1);
    let root = layout.root().unwrap();
    assert_eq!(root.assignments.len(), 5);

    // The bool and the address pack into slot 0
    assert!(root.has_assignment("paused", 0, 0, 1));
    assert!(root.has_assignment("owner", 0, 1, 20));

    // Everything else takes a whole slot of its own, with the mapping and
    // the string occupying just their marker slots
    assert!(root.has_assignment("total_supply", 1, 0, 32));
    assert!(root.has_assignment("balances", 2, 0, 32));
    assert!(root.has_assignment("name", 3, 0, 32));

    // The constant consumes no storage at all
    assert!(root.assignment_for("CAP").is_none());

    Ok(())
}

#[test]
fn layouts_survive_serialization() -> anyhow::Result<()> {
    let declarations = common::set_of(vec![common::contract("Token")
        .with_field(common::elementary("owner", "address"))
        .with_field(common::mapping("balances", "mapping(address=>uint256)"))]);

    let layout = common::resolve(declarations, "Token")?;
    let serialized = serde_json::to_string(&layout)?;

    // Raw descriptors serialize under the `type` key
    assert!(serialized.contains("\"type\":\"mapping(address=>uint256)\""));

    let deserialized: StorageLayout = serde_json::from_str(&serialized)?;
    assert_eq!(deserialized, layout);

    Ok(())
}
