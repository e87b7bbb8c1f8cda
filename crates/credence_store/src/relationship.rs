//! Relationship records: directed, typed, weighted edges between concepts.

use credence_foundation::{Audit, ConceptId, Fraction, Metadata, RelationshipId, TypeId};

/// A stored edge between two concepts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relationship {
    /// Store-assigned identifier.
    pub id: RelationshipId,
    /// Source concept.
    pub from: ConceptId,
    /// Target concept.
    pub to: ConceptId,
    /// The relationship type governing this edge.
    pub type_id: TypeId,
    /// Asserted likelihood that the edge holds, in `[0, 1]`.
    pub probability: Fraction,
    /// The asserter's meta-confidence in the assertion, in `[0, 1]`.
    pub confidence: Fraction,
    /// Who asserted the edge and when.
    pub creator: Audit,
    /// Ordered key/value metadata.
    pub metadata: Metadata,
}

/// A candidate relationship, before validation and identifier assignment.
#[derive(Clone, Debug)]
pub struct RelationshipDraft {
    /// Source concept.
    pub from: ConceptId,
    /// Target concept.
    pub to: ConceptId,
    /// The relationship type to assert under.
    pub type_id: TypeId,
    /// Asserted probability.
    pub probability: Fraction,
    /// Asserted confidence.
    pub confidence: Fraction,
    /// Metadata to attach to the edge.
    pub metadata: Metadata,
}

impl RelationshipDraft {
    /// Creates a draft with empty metadata.
    #[must_use]
    pub fn new(
        from: ConceptId,
        to: ConceptId,
        type_id: TypeId,
        probability: Fraction,
        confidence: Fraction,
    ) -> Self {
        Self {
            from,
            to,
            type_id,
            probability,
            confidence,
            metadata: Metadata::new(),
        }
    }

    /// Attaches metadata to the draft.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Fields of a relationship that its creator may change.
#[derive(Clone, Debug, Default)]
pub struct RelationshipPatch {
    /// Replacement probability.
    pub probability: Option<Fraction>,
    /// Replacement metadata.
    pub metadata: Option<Metadata>,
}

impl RelationshipPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement probability.
    #[must_use]
    pub fn with_probability(mut self, probability: Fraction) -> Self {
        self.probability = Some(probability);
        self
    }

    /// Sets the replacement metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probability.is_none() && self.metadata.is_none()
    }
}
