//! Assertion-time validation of candidate relationships.
//!
//! Validation runs three stages in order and stops at the first failure:
//! type status, the type's declarative rules in declaration order, then the
//! logical laws. The referential checks mirror the storage pipeline so that
//! error kinds come out in the contract's order: an unknown endpoint reports
//! `NotFound` before any rule gets to fire.

use credence_foundation::{Error, Result, ValidationCode, Violation};
use credence_store::{
    RelationshipDraft, RelationshipType, Store, TypeStatus, ValidationRule, deprecated_type_error,
};

/// Validates a candidate relationship against its declared type.
///
/// # Errors
///
/// - `NotFound` when the type or either endpoint does not resolve.
/// - `DEPRECATED_TYPE` validation error when the type is deprecated.
/// - A validation error from the first declarative rule that rejects the
///   draft, or `IRREFLEXIVE_VIOLATION` from the logical laws.
pub fn validate_assertion(store: &Store, draft: &RelationshipDraft) -> Result<()> {
    let ty = store
        .relationship_type(draft.type_id)
        .ok_or_else(|| Error::not_found(format!("{} does not exist", draft.type_id)))?;

    check_status(ty)?;

    if store.concept(draft.from).is_none() {
        return Err(Error::not_found(format!("{} does not exist", draft.from)));
    }
    if store.concept(draft.to).is_none() {
        return Err(Error::not_found(format!("{} does not exist", draft.to)));
    }

    for rule in &ty.validation {
        apply_rule(store, draft, rule)?;
    }

    check_laws(draft, ty)
}

/// Stage one: a deprecated type rejects every new assertion.
fn check_status(ty: &RelationshipType) -> Result<()> {
    match &ty.status {
        TypeStatus::Active => Ok(()),
        TypeStatus::Deprecated { replaced_by, .. } => {
            Err(deprecated_type_error(ty.id, *replaced_by))
        }
    }
}

/// Stage two: one declarative rule.
fn apply_rule(store: &Store, draft: &RelationshipDraft, rule: &ValidationRule) -> Result<()> {
    match rule {
        ValidationRule::RequiredMetadata(keys) => {
            for key in keys {
                if !draft.metadata.contains_key(key) {
                    return Err(Error::validation_with(
                        ValidationCode::RequiredMetadata,
                        format!("relationship metadata is missing required key {key}"),
                        Violation::new(key.clone(), "metadata key present", "absent"),
                    ));
                }
            }
            Ok(())
        }
        ValidationRule::NoSelfReference => {
            if draft.from == draft.to {
                return Err(Error::validation(
                    ValidationCode::SelfReference,
                    format!("{} may not relate to itself", draft.from),
                ));
            }
            Ok(())
        }
        ValidationRule::UniqueTarget => {
            if store.has_relationship(draft.from, draft.type_id, draft.to) {
                return Err(Error::validation(
                    ValidationCode::UniqueTarget,
                    format!(
                        "an edge of {} from {} to {} already exists",
                        draft.type_id, draft.from, draft.to
                    ),
                ));
            }
            Ok(())
        }
        ValidationRule::Custom {
            name,
            description,
            error_code,
        } => Err(Error::validation(
            ValidationCode::Custom(error_code.clone()),
            format!("custom rule {name} rejected the assertion: {description}"),
        )),
    }
}

/// Stage three: logical laws. Only the reflexivity pair acts at assertion
/// time; `symmetric` and `transitive` drive inference instead.
fn check_laws(draft: &RelationshipDraft, ty: &RelationshipType) -> Result<()> {
    if ty.properties.irreflexive && draft.from == draft.to {
        return Err(Error::validation(
            ValidationCode::IrreflexiveViolation,
            format!("{} is irreflexive: {} may not relate to itself", ty.name, draft.from),
        ));
    }
    Ok(())
}
