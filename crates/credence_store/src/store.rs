//! The store: three entity mappings behind a snapshot-style interface.
//!
//! `Store` uses persistent maps, so cloning is O(1) with structural sharing.
//! Every mutating method takes `&self` and returns a **new** `Store`; the
//! caller commits by replacing its copy. A failed operation returns an error
//! and the snapshot under construction is dropped whole, so no intermediate
//! state is ever observable and invariants hold after every commit.
//!
//! Identifiers are allocated from strictly monotonic counters and never
//! reused. Because the maps are ordered by identifier, iteration order is
//! insertion order.

use im::OrdMap;

use credence_foundation::{
    Audit, ConceptId, Error, Metadata, PrincipalId, RelationshipId, Result, Timestamp, TypeId,
    ValidationCode,
};

use crate::concept::{Concept, ConceptPatch};
use crate::relationship::{Relationship, RelationshipDraft, RelationshipPatch};
use crate::schema::{RelationshipType, TypeDefinition, TypeStatus};

/// In-memory mappings for concepts, relationships, and relationship types.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Store {
    /// Concepts by identifier.
    pub(crate) concepts: OrdMap<ConceptId, Concept>,
    /// Relationships by identifier.
    pub(crate) relationships: OrdMap<RelationshipId, Relationship>,
    /// Relationship types by identifier.
    pub(crate) types: OrdMap<TypeId, RelationshipType>,
    /// Next concept identifier to allocate.
    pub(crate) next_concept: u64,
    /// Next relationship identifier to allocate.
    pub(crate) next_relationship: u64,
    /// Next type identifier to allocate.
    pub(crate) next_type: u64,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Creation ---

    /// Creates a concept and returns the committed store with its identifier.
    ///
    /// # Errors
    ///
    /// Returns a validation error with code `EMPTY_NAME` when `name` is empty.
    pub fn create_concept(
        &self,
        name: impl Into<String>,
        description: Option<String>,
        metadata: Metadata,
        creator: Audit,
    ) -> Result<(Self, ConceptId)> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::validation(
                ValidationCode::EmptyName,
                "concept name must be non-empty",
            ));
        }

        let id = ConceptId::new(self.next_concept);
        let mut next = self.clone();
        next.next_concept += 1;
        next.concepts
            .insert(id, Concept::new(id, name, description, metadata, creator));
        Ok((next, id))
    }

    /// Registers a relationship type and returns the committed store with its
    /// identifier.
    ///
    /// # Errors
    ///
    /// - `EMPTY_NAME` validation error when the name is empty.
    /// - `AlreadyExists` when an **active** type already carries the name.
    /// - `InvalidOperation` when the definition is both reflexive and
    ///   irreflexive.
    pub fn register_type(
        &self,
        definition: TypeDefinition,
        creator: Audit,
    ) -> Result<(Self, TypeId)> {
        if definition.name.is_empty() {
            return Err(Error::validation(
                ValidationCode::EmptyName,
                "relationship type name must be non-empty",
            ));
        }
        if !definition.properties.is_coherent() {
            return Err(Error::invalid_operation(format!(
                "relationship type {} cannot be both reflexive and irreflexive",
                definition.name
            )));
        }
        if let Some(existing) = self.find_active_type_by_name(&definition.name) {
            return Err(Error::already_exists(format!(
                "active relationship type {} already has name {}",
                existing.id, definition.name
            )));
        }

        let id = TypeId::new(self.next_type);
        let mut next = self.clone();
        next.next_type += 1;
        next.types
            .insert(id, RelationshipType::from_definition(id, definition, creator));
        Ok((next, id))
    }

    /// Inserts a validated relationship and updates both adjacency caches in
    /// the same snapshot.
    ///
    /// This is the storage primitive beneath `assertRelationship`: it upholds
    /// the referential invariants (endpoints resolve, type resolves and is
    /// active) but does not run the type's declarative rules or logical laws.
    /// Callers run the validation engine first.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the type or either endpoint does not resolve.
    /// - `DEPRECATED_TYPE` validation error when the type is deprecated.
    pub fn insert_relationship(
        &self,
        draft: RelationshipDraft,
        creator: Audit,
    ) -> Result<(Self, RelationshipId)> {
        let ty = self
            .types
            .get(&draft.type_id)
            .ok_or_else(|| Error::not_found(format!("{} does not exist", draft.type_id)))?;
        if let TypeStatus::Deprecated { replaced_by, .. } = &ty.status {
            return Err(deprecated_type_error(ty.id, *replaced_by));
        }
        if !self.concepts.contains_key(&draft.from) {
            return Err(Error::not_found(format!("{} does not exist", draft.from)));
        }
        if !self.concepts.contains_key(&draft.to) {
            return Err(Error::not_found(format!("{} does not exist", draft.to)));
        }

        let id = RelationshipId::new(self.next_relationship);
        let mut next = self.clone();
        next.next_relationship += 1;
        next.relationships.insert(
            id,
            Relationship {
                id,
                from: draft.from,
                to: draft.to,
                type_id: draft.type_id,
                probability: draft.probability,
                confidence: draft.confidence,
                creator,
                metadata: draft.metadata,
            },
        );

        // Both caches move in the same snapshot; a self-loop touches one
        // concept record with both lists.
        if draft.from == draft.to {
            let mut endpoint = next.concepts[&draft.from].clone();
            endpoint.outgoing.push(id);
            endpoint.incoming.push(id);
            next.concepts.insert(draft.from, endpoint);
        } else {
            let mut source = next.concepts[&draft.from].clone();
            source.outgoing.push(id);
            next.concepts.insert(draft.from, source);

            let mut target = next.concepts[&draft.to].clone();
            target.incoming.push(id);
            next.concepts.insert(draft.to, target);
        }

        Ok((next, id))
    }

    // --- Updates ---

    /// Applies a patch to a concept.
    ///
    /// Only the original creator may update a record; `modified_at` is
    /// refreshed to `now`; identity and creator never change.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the concept does not resolve.
    /// - `PermissionDenied` when `caller` is not the creator.
    /// - `InvalidOperation` when the patch is empty.
    /// - `EMPTY_NAME` validation error when the patch empties the name.
    pub fn update_concept(
        &self,
        id: ConceptId,
        patch: ConceptPatch,
        caller: &PrincipalId,
        now: Timestamp,
    ) -> Result<Self> {
        let concept = self
            .concepts
            .get(&id)
            .ok_or_else(|| Error::not_found(format!("{id} does not exist")))?;
        if concept.creator.principal != *caller {
            return Err(Error::permission_denied(
                "modify",
                "concept",
                format!("{caller} is not the creator of {id}"),
            ));
        }
        if patch.is_empty() {
            return Err(Error::invalid_operation(format!(
                "update of {id} changes no fields"
            )));
        }
        if let Some(name) = &patch.name {
            if name.is_empty() {
                return Err(Error::validation(
                    ValidationCode::EmptyName,
                    "concept name must be non-empty",
                ));
            }
        }

        let mut updated = concept.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(description) = patch.description {
            updated.description = Some(description);
        }
        if let Some(metadata) = patch.metadata {
            updated.metadata = metadata;
        }
        updated.modified_at = now;

        let mut next = self.clone();
        next.concepts.insert(id, updated);
        Ok(next)
    }

    /// Applies a patch to a relationship.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the relationship does not resolve.
    /// - `PermissionDenied` when `caller` is not the creator.
    /// - `InvalidOperation` when the patch is empty.
    pub fn update_relationship(
        &self,
        id: RelationshipId,
        patch: RelationshipPatch,
        caller: &PrincipalId,
    ) -> Result<Self> {
        let relationship = self
            .relationships
            .get(&id)
            .ok_or_else(|| Error::not_found(format!("{id} does not exist")))?;
        if relationship.creator.principal != *caller {
            return Err(Error::permission_denied(
                "modify",
                "relationship",
                format!("{caller} is not the creator of {id}"),
            ));
        }
        if patch.is_empty() {
            return Err(Error::invalid_operation(format!(
                "update of {id} changes no fields"
            )));
        }

        let mut updated = relationship.clone();
        if let Some(probability) = patch.probability {
            updated.probability = probability;
        }
        if let Some(metadata) = patch.metadata {
            updated.metadata = metadata;
        }

        let mut next = self.clone();
        next.relationships.insert(id, updated);
        Ok(next)
    }

    /// Retires a relationship type.
    ///
    /// Existing edges of the type remain stored and readable; new assertions
    /// against it fail validation.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the type, or `replaced_by` if supplied, does not
    ///   resolve.
    /// - `InvalidOperation` when the type is already deprecated.
    pub fn deprecate_type(
        &self,
        id: TypeId,
        replaced_by: Option<TypeId>,
        reason: impl Into<String>,
    ) -> Result<Self> {
        let ty = self
            .types
            .get(&id)
            .ok_or_else(|| Error::not_found(format!("{id} does not exist")))?;
        if !ty.is_active() {
            return Err(Error::invalid_operation(format!(
                "{id} is already deprecated"
            )));
        }
        if let Some(replacement) = replaced_by {
            if !self.types.contains_key(&replacement) {
                return Err(Error::not_found(format!(
                    "replacement {replacement} does not exist"
                )));
            }
        }

        let mut updated = ty.clone();
        updated.status = TypeStatus::Deprecated {
            replaced_by,
            reason: reason.into(),
        };

        let mut next = self.clone();
        next.types.insert(id, updated);
        Ok(next)
    }

    // --- Lookups ---

    /// Gets a concept by identifier.
    #[must_use]
    pub fn concept(&self, id: ConceptId) -> Option<&Concept> {
        self.concepts.get(&id)
    }

    /// Gets a concept by identifier as an owned snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the concept does not resolve.
    pub fn get_concept(&self, id: ConceptId) -> Result<Concept> {
        self.concept(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("{id} does not exist")))
    }

    /// Gets a relationship by identifier.
    #[must_use]
    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    /// Gets a relationship by identifier as an owned snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the relationship does not resolve.
    pub fn get_relationship(&self, id: RelationshipId) -> Result<Relationship> {
        self.relationship(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("{id} does not exist")))
    }

    /// Gets a relationship type by identifier.
    #[must_use]
    pub fn relationship_type(&self, id: TypeId) -> Option<&RelationshipType> {
        self.types.get(&id)
    }

    /// Gets a relationship type by identifier as an owned snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the type does not resolve.
    pub fn get_relationship_type(&self, id: TypeId) -> Result<RelationshipType> {
        self.relationship_type(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("{id} does not exist")))
    }

    /// Finds the active type carrying a name, if any.
    ///
    /// Deprecated types keep their name but do not participate; the name is
    /// unique among active types only.
    #[must_use]
    pub fn find_active_type_by_name(&self, name: &str) -> Option<&RelationshipType> {
        self.types
            .values()
            .find(|ty| ty.is_active() && ty.name == name)
    }

    /// Returns true if an edge of `type_id` from `from` to `to` is stored.
    #[must_use]
    pub fn has_relationship(&self, from: ConceptId, type_id: TypeId, to: ConceptId) -> bool {
        self.relationships
            .values()
            .any(|r| r.from == from && r.type_id == type_id && r.to == to)
    }

    // --- Listing (always in insertion order) ---

    /// Iterates concepts in insertion order.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    /// Iterates relationships in insertion order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    /// Iterates relationship types in insertion order.
    pub fn relationship_types(&self) -> impl Iterator<Item = &RelationshipType> {
        self.types.values()
    }

    /// Returns the number of stored concepts.
    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Returns the number of stored relationships.
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Returns the number of registered relationship types.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // --- Integrity ---

    /// Checks the adjacency invariant: every relationship appears exactly once
    /// in its source's outgoing list and its target's incoming list, and every
    /// cached identifier resolves to a stored relationship.
    ///
    /// A `false` here is a programmer bug, not a user error; tests and debug
    /// assertions use this.
    #[must_use]
    pub fn adjacency_consistent(&self) -> bool {
        for relationship in self.relationships.values() {
            let Some(source) = self.concepts.get(&relationship.from) else {
                return false;
            };
            let Some(target) = self.concepts.get(&relationship.to) else {
                return false;
            };
            let out_count = source
                .outgoing
                .iter()
                .filter(|id| **id == relationship.id)
                .count();
            let in_count = target
                .incoming
                .iter()
                .filter(|id| **id == relationship.id)
                .count();
            if out_count != 1 || in_count != 1 {
                return false;
            }
        }
        for concept in self.concepts.values() {
            let resolves = |id: &RelationshipId| self.relationships.contains_key(id);
            if !concept.outgoing.iter().all(resolves) || !concept.incoming.iter().all(resolves) {
                return false;
            }
        }
        true
    }
}

/// Builds the `DEPRECATED_TYPE` validation error, naming the replacement when
/// one exists.
#[must_use]
pub fn deprecated_type_error(id: TypeId, replaced_by: Option<TypeId>) -> Error {
    let message = match replaced_by {
        Some(replacement) => format!("{id} is deprecated, replaced by {replacement}"),
        None => format!("{id} is deprecated"),
    };
    Error::validation(ValidationCode::DeprecatedType, message)
}
