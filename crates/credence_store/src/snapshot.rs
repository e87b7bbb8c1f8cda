//! The flat durable form of the store.
//!
//! Across lifecycle boundaries the three entity mappings flatten into ordered
//! `(id, record)` sequences plus the three identifier counters. The runtime
//! mappings are the source of truth at steady state; the flat sequences are
//! authoritative only across the boundary.
//!
//! Adjacency caches are not persisted: they are derivable from the
//! relationship sequence and are rebuilt on restore. Restoring is pure, so
//! resuming twice from the same snapshot yields identical stores.

use credence_foundation::{ConceptId, Error, RelationshipId, Result, TypeId};

use crate::concept::Concept;
use crate::relationship::Relationship;
use crate::schema::RelationshipType;
use crate::store::Store;

/// Ordered flat form of a [`Store`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Concepts in identifier order, adjacency caches cleared.
    pub concepts: Vec<(ConceptId, Concept)>,
    /// Relationships in identifier order.
    pub relationships: Vec<(RelationshipId, Relationship)>,
    /// Relationship types in identifier order.
    pub types: Vec<(TypeId, RelationshipType)>,
    /// Next concept identifier to allocate.
    pub next_concept: u64,
    /// Next relationship identifier to allocate.
    pub next_relationship: u64,
    /// Next type identifier to allocate.
    pub next_type: u64,
}

impl Store {
    /// Flattens the store into its durable form.
    #[must_use]
    pub fn to_snapshot(&self) -> Snapshot {
        let concepts = self
            .concepts
            .iter()
            .map(|(id, concept)| {
                let mut flat = concept.clone();
                flat.outgoing.clear();
                flat.incoming.clear();
                (*id, flat)
            })
            .collect();
        let relationships = self
            .relationships
            .iter()
            .map(|(id, relationship)| (*id, relationship.clone()))
            .collect();
        let types = self.types.iter().map(|(id, ty)| (*id, ty.clone())).collect();

        Snapshot {
            concepts,
            relationships,
            types,
            next_concept: self.next_concept,
            next_relationship: self.next_relationship,
            next_type: self.next_type,
        }
    }

    /// Rebuilds a store from its durable form.
    ///
    /// Adjacency caches are reconstructed by replaying the relationship
    /// sequence in identifier order.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the snapshot is internally
    /// inconsistent: a relationship references a missing concept or type, or a
    /// counter is not strictly beyond every stored identifier.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut store = Self::new();
        store.next_concept = snapshot.next_concept;
        store.next_relationship = snapshot.next_relationship;
        store.next_type = snapshot.next_type;

        for (id, ty) in snapshot.types {
            if id.value() >= snapshot.next_type {
                return Err(Error::serialization(format!(
                    "{id} is not below the type counter {}",
                    snapshot.next_type
                )));
            }
            store.types.insert(id, ty);
        }
        for (id, mut concept) in snapshot.concepts {
            if id.value() >= snapshot.next_concept {
                return Err(Error::serialization(format!(
                    "{id} is not below the concept counter {}",
                    snapshot.next_concept
                )));
            }
            concept.outgoing.clear();
            concept.incoming.clear();
            store.concepts.insert(id, concept);
        }
        for (id, relationship) in snapshot.relationships {
            if id.value() >= snapshot.next_relationship {
                return Err(Error::serialization(format!(
                    "{id} is not below the relationship counter {}",
                    snapshot.next_relationship
                )));
            }
            if !store.concepts.contains_key(&relationship.from) {
                return Err(Error::serialization(format!(
                    "{id} references missing {}",
                    relationship.from
                )));
            }
            if !store.concepts.contains_key(&relationship.to) {
                return Err(Error::serialization(format!(
                    "{id} references missing {}",
                    relationship.to
                )));
            }
            if !store.types.contains_key(&relationship.type_id) {
                return Err(Error::serialization(format!(
                    "{id} references missing {}",
                    relationship.type_id
                )));
            }

            if relationship.from == relationship.to {
                let mut endpoint = store.concepts[&relationship.from].clone();
                endpoint.outgoing.push(id);
                endpoint.incoming.push(id);
                store.concepts.insert(relationship.from, endpoint);
            } else {
                let mut source = store.concepts[&relationship.from].clone();
                source.outgoing.push(id);
                store.concepts.insert(relationship.from, source);

                let mut target = store.concepts[&relationship.to].clone();
                target.incoming.push(id);
                store.concepts.insert(relationship.to, target);
            }
            store.relationships.insert(id, relationship);
        }

        Ok(store)
    }
}
