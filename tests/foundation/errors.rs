//! Integration tests for the error taxonomy.

use credence_foundation::{Error, ErrorKind, ValidationCode, Violation};

#[test]
fn every_kind_renders_its_payload() {
    let cases: Vec<(Error, &str)> = vec![
        (Error::not_found("concept#7 does not exist"), "not found"),
        (Error::already_exists("type name IS-A"), "already exists"),
        (
            Error::validation(ValidationCode::UniqueTarget, "duplicate edge"),
            "UNIQUE_TARGET",
        ),
        (Error::invalid_operation("empty patch"), "invalid operation"),
        (
            Error::permission_denied("modify", "concept", "not the creator"),
            "permission denied",
        ),
        (
            Error::invalid_confidence("5/4", "numerator exceeds denominator"),
            "invalid confidence",
        ),
        (Error::system("out of cycles"), "system error"),
        (Error::serialization("truncated input"), "serialization error"),
        (Error::io("permission denied by OS"), "io error"),
    ];

    for (error, fragment) in cases {
        let rendered = error.to_string();
        assert!(
            rendered.contains(fragment),
            "{rendered:?} should contain {fragment:?}"
        );
    }
}

#[test]
fn validation_codes_render_in_screaming_snake() {
    let codes = [
        (ValidationCode::DeprecatedType, "DEPRECATED_TYPE"),
        (ValidationCode::IrreflexiveViolation, "IRREFLEXIVE_VIOLATION"),
        (ValidationCode::SelfReference, "SELF_REFERENCE"),
        (ValidationCode::RequiredMetadata, "REQUIRED_METADATA"),
        (ValidationCode::UniqueTarget, "UNIQUE_TARGET"),
        (ValidationCode::OutOfRange, "OUT_OF_RANGE"),
        (ValidationCode::EmptyName, "EMPTY_NAME"),
    ];
    for (code, expected) in codes {
        assert_eq!(code.to_string(), expected);
    }
}

#[test]
fn structured_violation_is_preserved() {
    let error = Error::validation_with(
        ValidationCode::RequiredMetadata,
        "missing key",
        Violation::new("source", "metadata key present", "absent"),
    );
    match &error.kind {
        ErrorKind::Validation(failure) => {
            let violation = failure.violation.as_ref().unwrap();
            assert_eq!(violation.field, "source");
            assert_eq!(violation.constraint, "metadata key present");
            assert_eq!(violation.value, "absent");
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn errors_match_by_kind() {
    let error = Error::permission_denied("modify", "relationship", "not the creator");
    assert!(matches!(
        error.kind,
        ErrorKind::PermissionDenied { ref resource, .. } if resource == "relationship"
    ));
}
