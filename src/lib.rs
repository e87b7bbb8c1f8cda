//! Credence - probabilistic concept base
//!
//! This crate re-exports all layers of the Credence system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: credence_runtime    — Session façade, REPL, snapshot persistence
//! Layer 2: credence_engine     — Validation, queries, inference
//! Layer 1: credence_store      — Concept/relationship/type records, the Store
//! Layer 0: credence_foundation — Core types (Fraction, identifiers, Error)
//! ```

pub use credence_engine as engine;
pub use credence_foundation as foundation;
pub use credence_runtime as runtime;
pub use credence_store as store;
