//! Tests for #[derive(Action)] macro

use optimist_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum ListAction {
    #[intent]
    Add { title: String },

    #[intent]
    ToggleAll,

    #[intent]
    Remove(u32),

    #[outcome]
    Added { id: u32, title: String },

    #[outcome]
    RemoveFailed(u32, String),

    Expired { generation: u64 },
}

#[test]
fn test_is_intent() {
    let action = ListAction::Add {
        title: "Buy milk".to_string(),
    };
    assert!(action.is_intent());
    assert!(!action.is_outcome());
}

#[test]
fn test_is_outcome() {
    let action = ListAction::Added {
        id: 5,
        title: "Buy milk".to_string(),
    };
    assert!(!action.is_intent());
    assert!(action.is_outcome());
}

#[test]
fn test_unit_and_tuple_variants() {
    assert!(ListAction::ToggleAll.is_intent());
    assert!(ListAction::Remove(3).is_intent());
    assert!(ListAction::RemoveFailed(3, "offline".to_string()).is_outcome());
}

#[test]
fn test_untagged_variant_is_neither() {
    let action = ListAction::Expired { generation: 2 };
    assert!(!action.is_intent());
    assert!(!action.is_outcome());
}

#[test]
fn test_name() {
    assert_eq!(ListAction::ToggleAll.name(), "ToggleAll");
    assert_eq!(ListAction::Remove(1).name(), "Remove");
    assert_eq!(ListAction::Expired { generation: 0 }.name(), "Expired");
}
