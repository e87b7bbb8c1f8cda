//! Entity storage for the Credence probabilistic concept base.
//!
//! This crate provides:
//! - [`Concept`], [`Relationship`], [`RelationshipType`] - The three record kinds
//! - [`Store`] - Snapshot-style mappings with monotonic identifier allocation
//! - [`Snapshot`] - The flat durable form crossed on suspend/resume

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod concept;
pub mod relationship;
pub mod schema;
pub mod snapshot;
pub mod store;

pub use concept::{Concept, ConceptPatch};
pub use relationship::{Relationship, RelationshipDraft, RelationshipPatch};
pub use schema::{
    CombinationMode, Inheritance, LogicalProperties, RelationshipType, TypeDefinition, TypeStatus,
    ValidationRule,
};
pub use snapshot::Snapshot;
pub use store::{Store, deprecated_type_error};
