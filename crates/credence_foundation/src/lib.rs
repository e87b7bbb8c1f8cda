//! Core types for the Credence probabilistic concept base.
//!
//! This crate provides:
//! - [`Fraction`] - Exact rational weights in `[0, 1]`
//! - [`ConceptId`], [`RelationshipId`], [`TypeId`] - Monotonic identifiers
//! - [`PrincipalId`], [`Timestamp`], [`Audit`] - Caller identity and stamps
//! - [`Metadata`] - Ordered key/value pairs
//! - [`Error`] - The error taxonomy shared by every layer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod audit;
pub mod error;
pub mod fraction;
pub mod id;
pub mod metadata;

pub use audit::{Audit, PrincipalId, Timestamp};
pub use error::{Error, ErrorKind, Result, ValidationCode, ValidationFailure, Violation};
pub use fraction::Fraction;
pub use id::{ConceptId, RelationshipId, TypeId};
pub use metadata::Metadata;
