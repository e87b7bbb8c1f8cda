//! Integration tests for relationship type lifecycle.

use credence_foundation::{ErrorKind, TypeId};
use credence_store::{
    CombinationMode, Inheritance, LogicalProperties, Store, TypeDefinition, TypeStatus,
    ValidationRule,
};

use crate::stamp;

#[test]
fn definition_round_trips_through_registration() {
    let definition = TypeDefinition::new("CITED-BY")
        .with_description("citation edge")
        .with_properties(LogicalProperties::new().irreflexive())
        .with_inheritance(Inheritance::new(true, CombinationMode::Minimum))
        .with_rule(ValidationRule::RequiredMetadata(vec!["source".to_string()]))
        .with_rule(ValidationRule::UniqueTarget);

    let (store, id) = Store::new().register_type(definition, stamp("system")).unwrap();
    let ty = store.get_relationship_type(id).unwrap();

    assert_eq!(ty.name, "CITED-BY");
    assert_eq!(ty.description.as_deref(), Some("citation edge"));
    assert!(ty.properties.irreflexive);
    assert!(ty.inheritance.inheritable);
    // Unexercised combination modes are stored verbatim.
    assert_eq!(ty.inheritance.combination, CombinationMode::Minimum);
    assert_eq!(ty.validation.len(), 2);
    assert!(ty.is_active());
}

#[test]
fn active_names_are_unique() {
    let (store, _) = Store::new()
        .register_type(TypeDefinition::new("KNOWS"), stamp("system"))
        .unwrap();
    let err = store
        .register_type(TypeDefinition::new("KNOWS"), stamp("system"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AlreadyExists(_)));
}

#[test]
fn deprecation_records_replacement_and_reason() {
    let (store, old) = Store::new()
        .register_type(TypeDefinition::new("OLD"), stamp("system"))
        .unwrap();
    let (store, new) = store
        .register_type(TypeDefinition::new("NEW"), stamp("system"))
        .unwrap();

    let store = store.deprecate_type(old, Some(new), "superseded").unwrap();
    let ty = store.get_relationship_type(old).unwrap();
    assert_eq!(
        ty.status,
        TypeStatus::Deprecated {
            replaced_by: Some(new),
            reason: "superseded".to_string(),
        }
    );
}

#[test]
fn double_deprecation_is_invalid() {
    let (store, id) = Store::new()
        .register_type(TypeDefinition::new("ONCE"), stamp("system"))
        .unwrap();
    let store = store.deprecate_type(id, None, "first").unwrap();
    let err = store.deprecate_type(id, None, "second").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidOperation(_)));
}

#[test]
fn type_identifiers_are_never_reused_after_deprecation() {
    let (store, first) = Store::new()
        .register_type(TypeDefinition::new("A"), stamp("system"))
        .unwrap();
    let store = store.deprecate_type(first, None, "gone").unwrap();
    let (store, second) = store
        .register_type(TypeDefinition::new("B"), stamp("system"))
        .unwrap();

    assert_eq!(first, TypeId::new(0));
    assert_eq!(second, TypeId::new(1));
    // The deprecated type is retained, not removed.
    assert_eq!(store.type_count(), 2);
}
