//! The seed scenarios: taxonomy chains, decay, symmetry, laws, permissions,
//! and deprecation, exercised end to end.

use credence_engine::{InferenceQuery, Provenance, RelationshipCriteria};
use credence_foundation::{ErrorKind, PrincipalId, TypeId, ValidationCode};
use credence_store::{LogicalProperties, TypeDefinition};

use crate::session;

fn alice() -> PrincipalId {
    PrincipalId::new("alice")
}

/// Transitive IS-A chain: A IS-A B IS-A C IS-A D, all certain.
#[test]
fn transitive_is_a_chain() {
    let mut session = session();
    let caller = alice();

    let a = session.create_concept(&caller, "A", None, None).unwrap();
    let b = session.create_concept(&caller, "B", None, None).unwrap();
    let c = session.create_concept(&caller, "C", None, None).unwrap();
    let d = session.create_concept(&caller, "D", None, None).unwrap();

    for (from, to) in [(a, b), (b, c), (c, d)] {
        session
            .assert_relationship(&caller, from, to, TypeId::IS_A, (1, 1), (1, 1), None)
            .unwrap();
    }

    let query = InferenceQuery::new(a)
        .with_type(TypeId::IS_A)
        .with_max_depth(3)
        .with_min_probability(credence_foundation::Fraction::one())
        .with_min_confidence(credence_foundation::Fraction::one());
    let results = session.infer_relationships(&query).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].to, b);
    assert!(matches!(results[0].provenance, Provenance::Direct(_)));
    assert_eq!(results[1].to, c);
    assert_eq!(results[2].to, d);
    for inferred in &results {
        assert!(inferred.probability.is_one());
        assert!(inferred.confidence.is_one());
    }
}

/// Probability decay: three 9/10 hops against a 3/4 floor keep exactly two
/// results, because 729/1000 < 3/4 by cross-multiplication.
#[test]
fn probability_decay_stops_at_the_threshold() {
    let mut session = session();
    let caller = alice();

    let x = session.create_concept(&caller, "X", None, None).unwrap();
    let y = session.create_concept(&caller, "Y", None, None).unwrap();
    let z = session.create_concept(&caller, "Z", None, None).unwrap();
    let w = session.create_concept(&caller, "W", None, None).unwrap();

    for (from, to) in [(x, y), (y, z), (z, w)] {
        session
            .assert_relationship(&caller, from, to, TypeId::IS_A, (9, 10), (1, 1), None)
            .unwrap();
    }

    let query = InferenceQuery::new(x)
        .with_max_depth(3)
        .with_min_probability(credence_foundation::Fraction::new(3, 4).unwrap());
    let results = session.infer_relationships(&query).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].to, y);
    assert_eq!(
        results[0].probability,
        credence_foundation::Fraction::new(9, 10).unwrap()
    );
    assert_eq!(results[1].to, z);
    assert_eq!(
        results[1].probability,
        credence_foundation::Fraction::new(81, 100).unwrap()
    );
}

/// A user-defined symmetric SIBLING type mirrors an incoming edge.
#[test]
fn symmetric_sibling_mirrors() {
    let mut session = session();
    let caller = alice();

    let sibling = session
        .create_relationship_type(
            &caller,
            TypeDefinition::new("SIBLING")
                .with_properties(LogicalProperties::new().symmetric().irreflexive()),
        )
        .unwrap();

    let rover = session.create_concept(&caller, "Rover", None, None).unwrap();
    let spot = session.create_concept(&caller, "Spot", None, None).unwrap();
    let original = session
        .assert_relationship(&caller, rover, spot, sibling, (95, 100), (80, 100), None)
        .unwrap();

    let query = InferenceQuery::new(spot)
        .with_type(sibling)
        .with_max_depth(1)
        .with_min_probability(credence_foundation::Fraction::new(90, 100).unwrap())
        .with_min_confidence(credence_foundation::Fraction::new(75, 100).unwrap());
    let results = session.infer_relationships(&query).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].from, spot);
    assert_eq!(results[0].to, rover);
    assert_eq!(
        results[0].probability,
        credence_foundation::Fraction::new(95, 100).unwrap()
    );
    assert_eq!(
        results[0].confidence,
        credence_foundation::Fraction::new(80, 100).unwrap()
    );
    assert_eq!(results[0].provenance, Provenance::Symmetric(original));
}

/// An irreflexive violation leaves the store untouched.
#[test]
fn irreflexive_violation_leaves_no_trace() {
    let mut session = session();
    let caller = alice();

    let x = session.create_concept(&caller, "X", None, None).unwrap();
    let err = session
        .assert_relationship(&caller, x, x, TypeId::IS_A, (1, 1), (1, 1), None)
        .unwrap_err();

    assert_eq!(
        err.validation_code(),
        Some(&ValidationCode::IrreflexiveViolation)
    );
    assert_eq!(session.store().relationship_count(), 0);
    assert!(session.get_concept(x).unwrap().outgoing.is_empty());
}

/// Only the creator may update a record.
#[test]
fn permission_isolation_between_callers() {
    let mut session = session();
    let u1 = PrincipalId::new("u1");
    let u2 = PrincipalId::new("u2");

    let c = session.create_concept(&u1, "C", None, None).unwrap();
    let err = session
        .update_concept(&u2, c, Some("C'".to_string()), None, None)
        .unwrap_err();

    match err.kind {
        ErrorKind::PermissionDenied {
            operation,
            resource,
            ..
        } => {
            assert_eq!(operation, "modify");
            assert_eq!(resource, "concept");
        }
        other => panic!("expected permission denied, got {other:?}"),
    }
    assert_eq!(session.get_concept(c).unwrap().name, "C");

    // The creator still can.
    session
        .update_concept(&u1, c, Some("C'".to_string()), None, None)
        .unwrap();
    assert_eq!(session.get_concept(c).unwrap().name, "C'");
}

/// Deprecation blocks new assertions but keeps old edges readable.
#[test]
fn deprecation_preserves_history() {
    let mut session = session();
    let caller = alice();

    let t1 = session
        .create_relationship_type(&caller, TypeDefinition::new("T1"))
        .unwrap();
    let a = session.create_concept(&caller, "A", None, None).unwrap();
    let b = session.create_concept(&caller, "B", None, None).unwrap();
    let r1 = session
        .assert_relationship(&caller, a, b, t1, (1, 1), (1, 1), None)
        .unwrap();

    session
        .deprecate_relationship_type(t1, None, "obsolete")
        .unwrap();

    let err = session
        .assert_relationship(&caller, b, a, t1, (1, 1), (1, 1), None)
        .unwrap_err();
    assert_eq!(err.validation_code(), Some(&ValidationCode::DeprecatedType));

    // The existing edge is still retrievable, by id and by query.
    assert_eq!(session.get_relationship(r1).unwrap().from, a);
    let page = session.query_relationships(&RelationshipCriteria::new().with_type(t1));
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, r1);
}
