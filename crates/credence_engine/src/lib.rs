//! Validation, declarative queries, and inference for Credence.
//!
//! This crate provides:
//! - [`validate_assertion`] - The three-stage assertion pipeline
//! - [`query_concepts`] / [`query_relationships`] - Declarative filtering
//! - [`infer`] - Bounded-depth derivation with provenance tags

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod infer;
pub mod query;
pub mod validate;

pub use infer::{Inferred, InferenceQuery, Provenance, infer};
pub use query::{ConceptCriteria, Page, RelationshipCriteria, query_concepts, query_relationships};
pub use validate::validate_assertion;
