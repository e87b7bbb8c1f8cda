//! The operations façade over the store.
//!
//! A `Session` owns the current committed [`Store`] and exposes the
//! coarse-grained command surface. Every mutation validates first, then
//! commits by replacing the owned store with the snapshot the operation
//! returned; a failed operation leaves the committed store untouched. The
//! authenticated caller identity is stamped onto every created record.

use credence_engine::{
    ConceptCriteria, InferenceQuery, Inferred, Page, RelationshipCriteria, query_concepts,
    query_relationships, validate_assertion,
};
use credence_foundation::{
    Audit, ConceptId, Error, Fraction, Metadata, PrincipalId, RelationshipId, Result, TypeId,
};
use credence_store::{
    Concept, ConceptPatch, Inheritance, LogicalProperties, Relationship, RelationshipDraft,
    RelationshipPatch, RelationshipType, Snapshot, Store, TypeDefinition,
};

use crate::clock::{Clock, SystemClock};

/// The reserved principal that owns the bootstrap relationship types.
const BOOTSTRAP_PRINCIPAL: &str = "system";

/// A live session over a concept base.
pub struct Session {
    /// The current committed store.
    store: Store,
    /// Time source for audit stamps.
    clock: Box<dyn Clock>,
}

impl Session {
    /// Creates a session over an empty store, on the wall clock.
    ///
    /// The four well-known relationship types are registered at their
    /// reserved identifiers: IS-A (0), HAS-A (1), PART-OF (2),
    /// PROPERTY-OF (3).
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Creates a session over an empty store with the given clock.
    #[must_use]
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        let mut session = Self {
            store: Store::new(),
            clock,
        };
        session.bootstrap();
        session
    }

    /// Creates a session over an existing store, e.g. one restored from a
    /// snapshot. Bootstrap types already present are left as they are.
    #[must_use]
    pub fn from_store(store: Store, clock: Box<dyn Clock>) -> Self {
        let mut session = Self { store, clock };
        session.bootstrap();
        session
    }

    /// Registers the well-known types, treating name collisions as "already
    /// initialized".
    ///
    /// # Panics
    ///
    /// Panics if registration fails for any reason other than a name
    /// collision (internal bug).
    fn bootstrap(&mut self) {
        let stamp = Audit::new(PrincipalId::new(BOOTSTRAP_PRINCIPAL), self.clock.now());
        let inheritable = Inheritance::new(true, credence_store::CombinationMode::Multiply);
        let definitions = [
            TypeDefinition::new("IS-A")
                .with_description("taxonomic subsumption")
                .with_properties(LogicalProperties::new().transitive().irreflexive())
                .with_inheritance(inheritable),
            TypeDefinition::new("HAS-A")
                .with_description("composition")
                .with_properties(LogicalProperties::new().irreflexive())
                .with_inheritance(inheritable),
            TypeDefinition::new("PART-OF")
                .with_description("mereological containment")
                .with_properties(LogicalProperties::new().transitive().irreflexive()),
            TypeDefinition::new("PROPERTY-OF")
                .with_description("attribute attachment")
                .with_properties(LogicalProperties::new().irreflexive())
                .with_inheritance(inheritable),
        ];

        for definition in definitions {
            match self.store.register_type(definition, stamp.clone()) {
                Ok((store, _)) => self.store = store,
                Err(err) if matches!(err.kind, credence_foundation::ErrorKind::AlreadyExists(_)) => {}
                Err(err) => panic!("bootstrap type registration failed: {err}"),
            }
        }
    }

    /// Returns the current committed store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Replaces the committed store, e.g. after loading a snapshot.
    pub fn replace_store(&mut self, store: Store) {
        self.store = store;
    }

    /// Flattens the committed store into its durable form.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.to_snapshot()
    }

    fn stamp(&self, caller: &PrincipalId) -> Audit {
        Audit::new(caller.clone(), self.clock.now())
    }

    // --- Concepts ---

    /// Creates a concept owned by `caller`.
    ///
    /// # Errors
    ///
    /// Returns an `EMPTY_NAME` validation error when the name is empty.
    pub fn create_concept(
        &mut self,
        caller: &PrincipalId,
        name: impl Into<String>,
        description: Option<String>,
        metadata: Option<Metadata>,
    ) -> Result<ConceptId> {
        let (store, id) = self.store.create_concept(
            name,
            description,
            metadata.unwrap_or_default(),
            self.stamp(caller),
        )?;
        self.store = store;
        Ok(id)
    }

    /// Updates a concept. Only its creator may do so; at least one field must
    /// be supplied.
    ///
    /// # Errors
    ///
    /// `NotFound`, `PermissionDenied`, or `InvalidOperation` per the store
    /// contract.
    pub fn update_concept(
        &mut self,
        caller: &PrincipalId,
        id: ConceptId,
        name: Option<String>,
        description: Option<String>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        let mut patch = ConceptPatch::new();
        patch.name = name;
        patch.description = description;
        patch.metadata = metadata;
        self.store = self
            .store
            .update_concept(id, patch, caller, self.clock.now())?;
        Ok(())
    }

    /// Gets a concept snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the concept does not resolve.
    pub fn get_concept(&self, id: ConceptId) -> Result<Concept> {
        self.store.get_concept(id)
    }

    /// Filters concepts by criteria.
    #[must_use]
    pub fn query_concepts(&self, criteria: &ConceptCriteria) -> Page<Concept> {
        query_concepts(&self.store, criteria)
    }

    // --- Relationship types ---

    /// Registers a relationship type owned by `caller`.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` for duplicate active names, `InvalidOperation` for an
    /// incoherent reflexivity pair, or an `EMPTY_NAME` validation error.
    pub fn create_relationship_type(
        &mut self,
        caller: &PrincipalId,
        definition: TypeDefinition,
    ) -> Result<TypeId> {
        let (store, id) = self.store.register_type(definition, self.stamp(caller))?;
        self.store = store;
        Ok(id)
    }

    /// Gets a relationship type snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the type does not resolve.
    pub fn get_relationship_type(&self, id: TypeId) -> Result<RelationshipType> {
        self.store.get_relationship_type(id)
    }

    /// Retires a relationship type. Existing edges stay readable; new
    /// assertions fail.
    ///
    /// # Errors
    ///
    /// `NotFound` or `InvalidOperation` per the store contract.
    pub fn deprecate_relationship_type(
        &mut self,
        id: TypeId,
        replaced_by: Option<TypeId>,
        reason: impl Into<String>,
    ) -> Result<()> {
        self.store = self.store.deprecate_type(id, replaced_by, reason)?;
        Ok(())
    }

    // --- Relationships ---

    /// Asserts a relationship after running the full validation pipeline.
    ///
    /// Probability and confidence arrive as raw `(numerator, denominator)`
    /// pairs and are validated here, at the boundary.
    ///
    /// # Errors
    ///
    /// - An `OUT_OF_RANGE` validation error for a malformed probability.
    /// - `InvalidConfidence` for a malformed confidence.
    /// - `NotFound` for unresolved endpoints or type.
    /// - A validation error from the type's rules or logical laws.
    #[allow(clippy::too_many_arguments)]
    pub fn assert_relationship(
        &mut self,
        caller: &PrincipalId,
        from: ConceptId,
        to: ConceptId,
        type_id: TypeId,
        probability: (u64, u64),
        confidence: (u64, u64),
        metadata: Option<Metadata>,
    ) -> Result<RelationshipId> {
        let probability = Fraction::new(probability.0, probability.1)?;
        let confidence = Fraction::new(confidence.0, confidence.1).map_err(|err| {
            Error::invalid_confidence(
                format!("{}/{}", confidence.0, confidence.1),
                err.to_string(),
            )
        })?;

        let draft = RelationshipDraft::new(from, to, type_id, probability, confidence)
            .with_metadata(metadata.unwrap_or_default());
        validate_assertion(&self.store, &draft)?;

        let (store, id) = self.store.insert_relationship(draft, self.stamp(caller))?;
        self.store = store;
        Ok(id)
    }

    /// Updates a relationship. Only its creator may do so.
    ///
    /// # Errors
    ///
    /// `NotFound`, `PermissionDenied`, `InvalidOperation`, or an
    /// `OUT_OF_RANGE` validation error for a malformed probability.
    pub fn update_relationship(
        &mut self,
        caller: &PrincipalId,
        id: RelationshipId,
        probability: Option<(u64, u64)>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        let mut patch = RelationshipPatch::new();
        if let Some((num, den)) = probability {
            patch.probability = Some(Fraction::new(num, den)?);
        }
        patch.metadata = metadata;
        self.store = self.store.update_relationship(id, patch, caller)?;
        Ok(())
    }

    /// Gets a relationship snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the relationship does not resolve.
    pub fn get_relationship(&self, id: RelationshipId) -> Result<Relationship> {
        self.store.get_relationship(id)
    }

    /// Filters relationships by criteria.
    #[must_use]
    pub fn query_relationships(&self, criteria: &RelationshipCriteria) -> Page<Relationship> {
        query_relationships(&self.store, criteria)
    }

    // --- Inference ---

    /// Derives relationships reachable from a starting concept.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the starting concept or queried type does not
    /// resolve.
    pub fn infer_relationships(&self, query: &InferenceQuery) -> Result<Vec<Inferred>> {
        credence_engine::infer(&self.store, query)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
