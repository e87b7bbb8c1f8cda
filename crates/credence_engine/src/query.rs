//! Declarative queries over concepts and relationships.
//!
//! Every criterion field is optional; an absent field matches everything,
//! and present fields AND-combine. Results preserve the store's insertion
//! order. The result envelope carries pagination fields, but the engine
//! returns a single page holding every match; true pagination is a future
//! extension of the envelope, not of the matching semantics.

use credence_foundation::{ConceptId, Fraction, PrincipalId, TypeId};
use credence_store::{Concept, Relationship, Store};

/// Filter criteria for concepts.
#[derive(Clone, Debug, Default)]
pub struct ConceptCriteria {
    /// Byte-wise, case-sensitive substring of the concept name.
    pub name_contains: Option<String>,
    /// Every pair must be present exactly in the concept's metadata.
    pub metadata: Vec<(String, String)>,
    /// Exact creator principal.
    pub creator: Option<PrincipalId>,
}

impl ConceptCriteria {
    /// Creates criteria that match every concept.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the name to contain a substring.
    #[must_use]
    pub fn with_name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    /// Requires an exact metadata pair.
    #[must_use]
    pub fn with_metadata_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    /// Requires an exact creator.
    #[must_use]
    pub fn with_creator(mut self, creator: PrincipalId) -> Self {
        self.creator = Some(creator);
        self
    }
}

/// Filter criteria for relationships.
#[derive(Clone, Debug, Default)]
pub struct RelationshipCriteria {
    /// Exact source concept.
    pub from: Option<ConceptId>,
    /// Exact target concept.
    pub to: Option<ConceptId>,
    /// Exact relationship type.
    pub type_id: Option<TypeId>,
    /// Exact creator principal.
    pub creator: Option<PrincipalId>,
    /// Inclusive lower bound on probability.
    pub min_probability: Option<Fraction>,
    /// Inclusive upper bound on probability.
    pub max_probability: Option<Fraction>,
    /// Every pair must be present exactly in the relationship's metadata.
    pub metadata: Vec<(String, String)>,
}

impl RelationshipCriteria {
    /// Creates criteria that match every relationship.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires an exact source concept.
    #[must_use]
    pub const fn with_from(mut self, from: ConceptId) -> Self {
        self.from = Some(from);
        self
    }

    /// Requires an exact target concept.
    #[must_use]
    pub const fn with_to(mut self, to: ConceptId) -> Self {
        self.to = Some(to);
        self
    }

    /// Requires an exact relationship type.
    #[must_use]
    pub const fn with_type(mut self, type_id: TypeId) -> Self {
        self.type_id = Some(type_id);
        self
    }

    /// Requires an exact creator.
    #[must_use]
    pub fn with_creator(mut self, creator: PrincipalId) -> Self {
        self.creator = Some(creator);
        self
    }

    /// Requires probability at or above a bound.
    #[must_use]
    pub fn with_min_probability(mut self, bound: Fraction) -> Self {
        self.min_probability = Some(bound);
        self
    }

    /// Requires probability at or below a bound.
    #[must_use]
    pub fn with_max_probability(mut self, bound: Fraction) -> Self {
        self.max_probability = Some(bound);
        self
    }

    /// Requires an exact metadata pair.
    #[must_use]
    pub fn with_metadata_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

/// One page of query results.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// Matching items in store insertion order.
    pub items: Vec<T>,
    /// Total number of matches.
    pub total: usize,
    /// Offset of this page within the total. Always zero today.
    pub offset: usize,
    /// Requested page size. `None` means unbounded.
    pub limit: Option<usize>,
}

impl<T> Page<T> {
    /// Wraps all matches in a single unbounded page.
    #[must_use]
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len();
        Self {
            items,
            total,
            offset: 0,
            limit: None,
        }
    }
}

/// Filters concepts by criteria, in insertion order.
#[must_use]
pub fn query_concepts(store: &Store, criteria: &ConceptCriteria) -> Page<Concept> {
    Page::single(
        store
            .concepts()
            .filter(|concept| concept_matches(concept, criteria))
            .cloned()
            .collect(),
    )
}

/// Filters relationships by criteria, in insertion order.
#[must_use]
pub fn query_relationships(store: &Store, criteria: &RelationshipCriteria) -> Page<Relationship> {
    Page::single(
        store
            .relationships()
            .filter(|relationship| relationship_matches(relationship, criteria))
            .cloned()
            .collect(),
    )
}

fn concept_matches(concept: &Concept, criteria: &ConceptCriteria) -> bool {
    if let Some(needle) = &criteria.name_contains {
        if !concept.name.contains(needle.as_str()) {
            return false;
        }
    }
    if let Some(creator) = &criteria.creator {
        if concept.creator.principal != *creator {
            return false;
        }
    }
    criteria
        .metadata
        .iter()
        .all(|(k, v)| concept.metadata.contains_pair(k, v))
}

fn relationship_matches(relationship: &Relationship, criteria: &RelationshipCriteria) -> bool {
    if criteria.from.is_some_and(|from| relationship.from != from) {
        return false;
    }
    if criteria.to.is_some_and(|to| relationship.to != to) {
        return false;
    }
    if criteria
        .type_id
        .is_some_and(|type_id| relationship.type_id != type_id)
    {
        return false;
    }
    if let Some(creator) = &criteria.creator {
        if relationship.creator.principal != *creator {
            return false;
        }
    }
    if let Some(bound) = &criteria.min_probability {
        if relationship.probability < *bound {
            return false;
        }
    }
    if let Some(bound) = &criteria.max_probability {
        if relationship.probability > *bound {
            return false;
        }
    }
    criteria
        .metadata
        .iter()
        .all(|(k, v)| relationship.metadata.contains_pair(k, v))
}
