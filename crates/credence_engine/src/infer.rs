//! Bounded-depth inference over typed edges.
//!
//! A single-source traversal materializes direct, symmetric, and transitive
//! derivations with propagated weights. Probability accumulates by
//! multiplication and confidence pessimistically by minimum, so both are
//! non-increasing along a chain; a branch that falls below a threshold is
//! pruned because no deeper path can recover.
//!
//! Termination on cyclic graphs comes from the visited-target set: once a
//! `(start, target)` pair has been emitted, no later path to that target is
//! explored. **The first path found wins**, which makes results sensitive to
//! store insertion order; edges are always scanned in that order.

use std::collections::HashSet;

use credence_foundation::{
    Audit, ConceptId, Error, Fraction, Metadata, RelationshipId, Result, TypeId,
};
use credence_store::{Relationship, Store};

/// An inference request.
#[derive(Clone, Debug)]
pub struct InferenceQuery {
    /// The concept derivations start from.
    pub start: ConceptId,
    /// The relationship type to follow. Defaults to IS-A.
    pub relationship_type: Option<TypeId>,
    /// Maximum chain length; unbounded when absent. Direct edges count as
    /// depth one and are always within bounds.
    pub max_depth: Option<u32>,
    /// Inclusive lower bound on derived probability.
    pub min_probability: Option<Fraction>,
    /// Inclusive lower bound on derived confidence.
    pub min_confidence: Option<Fraction>,
}

impl InferenceQuery {
    /// Creates an unbounded query over IS-A edges.
    #[must_use]
    pub const fn new(start: ConceptId) -> Self {
        Self {
            start,
            relationship_type: None,
            max_depth: None,
            min_probability: None,
            min_confidence: None,
        }
    }

    /// Follows a specific relationship type.
    #[must_use]
    pub const fn with_type(mut self, type_id: TypeId) -> Self {
        self.relationship_type = Some(type_id);
        self
    }

    /// Bounds the chain length.
    #[must_use]
    pub const fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Drops derivations below a probability bound.
    #[must_use]
    pub fn with_min_probability(mut self, bound: Fraction) -> Self {
        self.min_probability = Some(bound);
        self
    }

    /// Drops derivations below a confidence bound.
    #[must_use]
    pub fn with_min_confidence(mut self, bound: Fraction) -> Self {
        self.min_confidence = Some(bound);
        self
    }
}

/// How a derived edge came to be.
#[derive(Clone, Debug, PartialEq)]
pub enum Provenance {
    /// A stored edge, passed through unchanged.
    Direct(RelationshipId),
    /// The mirror of a stored edge of a symmetric type.
    Symmetric(RelationshipId),
    /// The composition of a chain of edges of a transitive type.
    Transitive {
        /// The direct edge the chain grew from.
        first: RelationshipId,
        /// The edge that completed the chain.
        second: RelationshipId,
        /// The accumulated probability along the chain.
        probability: Fraction,
    },
}

/// A derived relationship.
///
/// Derived records mint no identifiers of their own; identity lives in the
/// provenance tag, which names the stored edge(s) the derivation came from.
/// Creator and metadata are copied from the stored edge that completed the
/// derivation.
#[derive(Clone, Debug, PartialEq)]
pub struct Inferred {
    /// Source concept, always the query's starting concept.
    pub from: ConceptId,
    /// Derived target concept.
    pub to: ConceptId,
    /// The followed relationship type.
    pub type_id: TypeId,
    /// Derived probability.
    pub probability: Fraction,
    /// Derived confidence.
    pub confidence: Fraction,
    /// Creator of the completing stored edge.
    pub creator: Audit,
    /// Metadata of the completing stored edge.
    pub metadata: Metadata,
    /// How the edge was derived.
    pub provenance: Provenance,
}

/// Derives relationships reachable from a starting concept.
///
/// Inference is a pure read: an empty result is `Ok`, and the store is never
/// touched.
///
/// # Errors
///
/// Returns `NotFound` when the starting concept or the queried type does not
/// resolve.
pub fn infer(store: &Store, query: &InferenceQuery) -> Result<Vec<Inferred>> {
    if store.concept(query.start).is_none() {
        return Err(Error::not_found(format!("{} does not exist", query.start)));
    }
    let type_id = query.relationship_type.unwrap_or(TypeId::IS_A);
    let ty = store
        .relationship_type(type_id)
        .ok_or_else(|| Error::not_found(format!("{type_id} does not exist")))?;

    let min_probability = query.min_probability.clone().unwrap_or_else(Fraction::zero);
    let min_confidence = query.min_confidence.clone().unwrap_or_else(Fraction::zero);

    let mut visited: HashSet<ConceptId> = HashSet::new();
    let mut results: Vec<Inferred> = Vec::new();
    let mut roots: Vec<Relationship> = Vec::new();

    // Step 1: direct edges out of the start, plus mirrors of incoming edges
    // when the type is symmetric.
    for edge in store.relationships().filter(|r| r.type_id == type_id) {
        if edge.from == query.start {
            if edge.probability >= min_probability
                && edge.confidence >= min_confidence
                && !visited.contains(&edge.to)
            {
                visited.insert(edge.to);
                results.push(Inferred {
                    from: edge.from,
                    to: edge.to,
                    type_id,
                    probability: edge.probability.clone(),
                    confidence: edge.confidence.clone(),
                    creator: edge.creator.clone(),
                    metadata: edge.metadata.clone(),
                    provenance: Provenance::Direct(edge.id),
                });
                roots.push(edge.clone());
            }
        } else if ty.properties.symmetric
            && edge.to == query.start
            && edge.probability >= min_probability
            && edge.confidence >= min_confidence
            && !visited.contains(&edge.from)
        {
            visited.insert(edge.from);
            results.push(Inferred {
                from: query.start,
                to: edge.from,
                type_id,
                probability: edge.probability.clone(),
                confidence: edge.confidence.clone(),
                creator: edge.creator.clone(),
                metadata: edge.metadata.clone(),
                provenance: Provenance::Symmetric(edge.id),
            });
        }
    }

    // Step 2: transitive expansion from every emitted direct edge.
    if ty.properties.transitive {
        let walk = Walk {
            store,
            type_id,
            start: query.start,
            max_depth: query.max_depth,
            min_probability,
            min_confidence,
        };
        for root in &roots {
            walk.expand(
                root,
                root.to,
                &root.probability,
                &root.confidence,
                1,
                &mut visited,
                &mut results,
            );
        }
    }

    Ok(results)
}

/// Fixed parameters of one transitive traversal.
struct Walk<'a> {
    store: &'a Store,
    type_id: TypeId,
    start: ConceptId,
    max_depth: Option<u32>,
    min_probability: Fraction,
    min_confidence: Fraction,
}

impl Walk<'_> {
    /// Extends chains rooted at `root` from `current`, at `depth` hops so far.
    #[allow(clippy::too_many_arguments)]
    fn expand(
        &self,
        root: &Relationship,
        current: ConceptId,
        probability: &Fraction,
        confidence: &Fraction,
        depth: u32,
        visited: &mut HashSet<ConceptId>,
        results: &mut Vec<Inferred>,
    ) {
        let next_depth = depth + 1;
        if self.max_depth.is_some_and(|max| next_depth > max) {
            return;
        }
        for edge in self
            .store
            .relationships()
            .filter(|r| r.type_id == self.type_id && r.from == current)
        {
            let derived_probability = probability.multiply(&edge.probability);
            let derived_confidence = confidence.min_combine(&edge.confidence);
            // Weights only decrease from here on; the whole branch is dead.
            if derived_probability < self.min_probability
                || derived_confidence < self.min_confidence
            {
                continue;
            }
            if visited.contains(&edge.to) {
                continue;
            }
            visited.insert(edge.to);
            results.push(Inferred {
                from: self.start,
                to: edge.to,
                type_id: self.type_id,
                probability: derived_probability.clone(),
                confidence: derived_confidence.clone(),
                creator: edge.creator.clone(),
                metadata: edge.metadata.clone(),
                provenance: Provenance::Transitive {
                    first: root.id,
                    second: edge.id,
                    probability: derived_probability.clone(),
                },
            });
            self.expand(
                root,
                edge.to,
                &derived_probability,
                &derived_confidence,
                next_depth,
                visited,
                results,
            );
        }
    }
}
