//! Concept records: the nodes of the knowledge graph.

use credence_foundation::{Audit, ConceptId, Metadata, RelationshipId, Timestamp};

/// A named node in the knowledge graph.
///
/// The `outgoing` and `incoming` lists are adjacency caches maintained by the
/// store: they duplicate information derivable from the relationship map and
/// are kept consistent with it after every successful mutation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Concept {
    /// Store-assigned identifier.
    pub id: ConceptId,
    /// Non-empty display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Who created the concept and when.
    pub creator: Audit,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last successful update time.
    pub modified_at: Timestamp,
    /// Identifiers of relationships leaving this concept, in assertion order.
    pub outgoing: Vec<RelationshipId>,
    /// Identifiers of relationships arriving at this concept, in assertion order.
    pub incoming: Vec<RelationshipId>,
    /// Ordered key/value metadata.
    pub metadata: Metadata,
}

impl Concept {
    /// Creates a fresh concept record.
    #[must_use]
    pub fn new(
        id: ConceptId,
        name: String,
        description: Option<String>,
        metadata: Metadata,
        creator: Audit,
    ) -> Self {
        let at = creator.at;
        Self {
            id,
            name,
            description,
            creator,
            created_at: at,
            modified_at: at,
            outgoing: Vec::new(),
            incoming: Vec::new(),
            metadata,
        }
    }
}

/// Fields of a concept that its creator may change.
///
/// Absent fields are left untouched. An all-absent patch is rejected by the
/// store as an invalid operation.
#[derive(Clone, Debug, Default)]
pub struct ConceptPatch {
    /// Replacement name, which must still be non-empty.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement metadata.
    pub metadata: Option<Metadata>,
}

impl ConceptPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
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
        self.name.is_none() && self.description.is_none() && self.metadata.is_none()
    }
}
