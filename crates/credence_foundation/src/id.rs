//! Monotonic identifiers for concepts, relationships, and relationship types.
//!
//! Identifiers are opaque non-negative integers allocated by the store in
//! strictly increasing order. They are never reused, so ordering by
//! identifier is ordering by creation.

use std::fmt;

/// Identifier of a concept (a node in the knowledge graph).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConceptId(u64);

impl ConceptId {
    /// Creates a concept identifier from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConceptId({})", self.0)
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "concept#{}", self.0)
    }
}

/// Identifier of a stored relationship (an edge in the knowledge graph).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationshipId(u64);

impl RelationshipId {
    /// Creates a relationship identifier from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelationshipId({})", self.0)
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relationship#{}", self.0)
    }
}

/// Identifier of a relationship type (the schema object for a family of edges).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeId(u64);

impl TypeId {
    /// The bootstrap IS-A type: transitive, irreflexive, inheritable.
    pub const IS_A: Self = Self(0);
    /// The bootstrap HAS-A type: irreflexive, inheritable.
    pub const HAS_A: Self = Self(1);
    /// The bootstrap PART-OF type: transitive, irreflexive, not inheritable.
    pub const PART_OF: Self = Self(2);
    /// The bootstrap PROPERTY-OF type: irreflexive, inheritable.
    pub const PROPERTY_OF: Self = Self(3);

    /// Creates a type identifier from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}
