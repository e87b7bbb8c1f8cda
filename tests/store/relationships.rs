//! Integration tests for relationship storage and adjacency caches.

use credence_foundation::{ConceptId, ErrorKind, Fraction, Metadata, PrincipalId};
use credence_store::{
    LogicalProperties, RelationshipDraft, RelationshipPatch, Store, TypeDefinition,
};

use crate::stamp;

fn seeded() -> (Store, ConceptId, ConceptId, credence_foundation::TypeId) {
    let store = Store::new();
    let (store, ty) = store
        .register_type(
            TypeDefinition::new("IS-A")
                .with_properties(LogicalProperties::new().transitive().irreflexive()),
            stamp("system"),
        )
        .unwrap();
    let (store, dog) = store
        .create_concept("Dog", None, Metadata::new(), stamp("alice"))
        .unwrap();
    let (store, mammal) = store
        .create_concept("Mammal", None, Metadata::new(), stamp("alice"))
        .unwrap();
    (store, dog, mammal, ty)
}

#[test]
fn assertion_writes_edge_and_both_caches() {
    let (store, dog, mammal, ty) = seeded();
    let (store, id) = store
        .insert_relationship(
            RelationshipDraft::new(
                dog,
                mammal,
                ty,
                Fraction::one(),
                Fraction::new(99, 100).unwrap(),
            ),
            stamp("alice"),
        )
        .unwrap();

    let edge = store.get_relationship(id).unwrap();
    assert_eq!(edge.from, dog);
    assert_eq!(edge.to, mammal);
    assert_eq!(edge.confidence, Fraction::new(99, 100).unwrap());

    assert_eq!(store.get_concept(dog).unwrap().outgoing, vec![id]);
    assert_eq!(store.get_concept(mammal).unwrap().incoming, vec![id]);
}

#[test]
fn adjacency_lists_grow_in_assertion_order() {
    let (store, dog, mammal, ty) = seeded();
    let (store, animal) = store
        .create_concept("Animal", None, Metadata::new(), stamp("alice"))
        .unwrap();

    let (store, first) = store
        .insert_relationship(
            RelationshipDraft::new(dog, mammal, ty, Fraction::one(), Fraction::one()),
            stamp("alice"),
        )
        .unwrap();
    let (store, second) = store
        .insert_relationship(
            RelationshipDraft::new(dog, animal, ty, Fraction::one(), Fraction::one()),
            stamp("alice"),
        )
        .unwrap();

    assert_eq!(store.get_concept(dog).unwrap().outgoing, vec![first, second]);
    assert!(store.adjacency_consistent());
}

#[test]
fn unknown_endpoint_fails_without_partial_writes() {
    let (store, dog, _, ty) = seeded();
    let err = store
        .insert_relationship(
            RelationshipDraft::new(
                dog,
                ConceptId::new(404),
                ty,
                Fraction::one(),
                Fraction::one(),
            ),
            stamp("alice"),
        )
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::NotFound(_)));
    assert_eq!(store.relationship_count(), 0);
    assert!(store.get_concept(dog).unwrap().outgoing.is_empty());
    assert!(store.adjacency_consistent());
}

#[test]
fn weights_are_stored_verbatim() {
    let (store, dog, mammal, ty) = seeded();
    let (store, id) = store
        .insert_relationship(
            RelationshipDraft::new(
                dog,
                mammal,
                ty,
                Fraction::new(50, 100).unwrap(),
                Fraction::new(2, 4).unwrap(),
            ),
            stamp("alice"),
        )
        .unwrap();

    let edge = store.get_relationship(id).unwrap();
    assert_eq!(edge.probability.to_string(), "50/100");
    assert_eq!(edge.confidence.to_string(), "2/4");
    // Yet both compare equal to 1/2.
    assert_eq!(edge.probability, Fraction::new(1, 2).unwrap());
}

#[test]
fn update_relationship_is_creator_only() {
    let (store, dog, mammal, ty) = seeded();
    let (store, id) = store
        .insert_relationship(
            RelationshipDraft::new(dog, mammal, ty, Fraction::one(), Fraction::one()),
            stamp("alice"),
        )
        .unwrap();

    let err = store
        .update_relationship(
            id,
            RelationshipPatch::new().with_probability(Fraction::zero()),
            &PrincipalId::new("mallory"),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PermissionDenied { .. }));
    assert!(store.get_relationship(id).unwrap().probability.is_one());

    let store = store
        .update_relationship(
            id,
            RelationshipPatch::new().with_probability(Fraction::new(3, 4).unwrap()),
            &PrincipalId::new("alice"),
        )
        .unwrap();
    assert_eq!(
        store.get_relationship(id).unwrap().probability,
        Fraction::new(3, 4).unwrap()
    );
}

#[test]
fn relationship_ids_share_no_sequence_with_concepts() {
    let (store, dog, mammal, ty) = seeded();
    let (store, edge) = store
        .insert_relationship(
            RelationshipDraft::new(dog, mammal, ty, Fraction::one(), Fraction::one()),
            stamp("alice"),
        )
        .unwrap();

    // Concepts are at 0 and 1; the first relationship still starts at 0.
    assert_eq!(edge.value(), 0);
    assert_eq!(store.concept_count(), 2);
}
