//! Relationship type definitions: schema objects for families of edges.
//!
//! A relationship type declares the logical laws its edges obey, how weights
//! combine during inference, and the declarative rules every assertion must
//! pass. Types transition from `Active` to `Deprecated` and are never
//! removed, so existing edges stay interpretable.

use credence_foundation::{Audit, Metadata, TypeId};

/// The four independent logical laws of a relationship type.
///
/// `reflexive` and `irreflexive` are mutually exclusive; the store rejects a
/// definition that sets both. Only `transitive` and `symmetric` drive
/// derivation; the reflexivity pair acts at assertion time.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalProperties {
    /// Edges compose: `a R b` and `b R c` derive `a R c`.
    pub transitive: bool,
    /// Edges mirror: `a R b` derives `b R a`.
    pub symmetric: bool,
    /// Self-loops are always permitted.
    pub reflexive: bool,
    /// Self-loops are rejected at assertion time.
    pub irreflexive: bool,
}

impl LogicalProperties {
    /// Creates properties with every law disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the transitive law.
    #[must_use]
    pub const fn transitive(mut self) -> Self {
        self.transitive = true;
        self
    }

    /// Enables the symmetric law.
    #[must_use]
    pub const fn symmetric(mut self) -> Self {
        self.symmetric = true;
        self
    }

    /// Enables the reflexive law.
    #[must_use]
    pub const fn reflexive(mut self) -> Self {
        self.reflexive = true;
        self
    }

    /// Enables the irreflexive law.
    #[must_use]
    pub const fn irreflexive(mut self) -> Self {
        self.irreflexive = true;
        self
    }

    /// Returns true unless both reflexivity laws are set at once.
    #[must_use]
    pub const fn is_coherent(self) -> bool {
        !(self.reflexive && self.irreflexive)
    }
}

/// How probability combines along a derivation chain.
///
/// Only `Multiply` is exercised by the inference engine; the other modes are
/// stored verbatim for forward compatibility.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombinationMode {
    /// Multiply weights along the chain.
    #[default]
    Multiply,
    /// Keep the minimum weight seen.
    Minimum,
    /// Keep the maximum weight seen.
    Maximum,
    /// The most recent weight wins.
    Override,
}

/// Inheritance behavior of a relationship type.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inheritance {
    /// Whether edges of this type propagate along IS-A chains.
    pub inheritable: bool,
    /// How weights combine when they do.
    pub combination: CombinationMode,
}

impl Inheritance {
    /// Creates inheritance settings.
    #[must_use]
    pub const fn new(inheritable: bool, combination: CombinationMode) -> Self {
        Self {
            inheritable,
            combination,
        }
    }
}

/// A declarative predicate applied to every assertion of a type.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationRule {
    /// Every listed key must appear in the relationship's metadata.
    RequiredMetadata(Vec<String>),
    /// At most one edge of this type may exist per (source, target) pair.
    UniqueTarget,
    /// Source and target must differ.
    NoSelfReference,
    /// A user-defined extension point. Always fails, surfacing its code.
    Custom {
        /// Short rule name.
        name: String,
        /// Human-readable description of the rule.
        description: String,
        /// Machine-readable code reported on failure.
        error_code: String,
    },
}

/// Lifecycle status of a relationship type.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeStatus {
    /// The type accepts new assertions.
    Active,
    /// The type is retired; new assertions fail, old edges remain readable.
    Deprecated {
        /// The type that supersedes this one, when there is one.
        replaced_by: Option<TypeId>,
        /// Why the type was retired.
        reason: String,
    },
}

impl TypeStatus {
    /// Returns true if the type accepts new assertions.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// The caller-supplied part of a relationship type, before registration.
#[derive(Clone, Debug)]
pub struct TypeDefinition {
    /// Type name, unique among active types.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Logical laws.
    pub properties: LogicalProperties,
    /// Inheritance behavior.
    pub inheritance: Inheritance,
    /// Declarative rules, applied in order at assertion time.
    pub validation: Vec<ValidationRule>,
    /// Ordered key/value metadata.
    pub metadata: Metadata,
}

impl TypeDefinition {
    /// Creates a definition with no laws, no rules, and empty metadata.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            properties: LogicalProperties::new(),
            inheritance: Inheritance::default(),
            validation: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the logical properties.
    #[must_use]
    pub const fn with_properties(mut self, properties: LogicalProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Sets the inheritance behavior.
    #[must_use]
    pub const fn with_inheritance(mut self, inheritance: Inheritance) -> Self {
        self.inheritance = inheritance;
        self
    }

    /// Appends a validation rule.
    #[must_use]
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A registered relationship type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationshipType {
    /// Store-assigned identifier.
    pub id: TypeId,
    /// Type name, unique among active types.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Logical laws.
    pub properties: LogicalProperties,
    /// Inheritance behavior.
    pub inheritance: Inheritance,
    /// Declarative rules, applied in order at assertion time.
    pub validation: Vec<ValidationRule>,
    /// Lifecycle status.
    pub status: TypeStatus,
    /// Who registered the type and when.
    pub creator: Audit,
    /// Ordered key/value metadata.
    pub metadata: Metadata,
}

impl RelationshipType {
    /// Materializes a registered type from a definition.
    #[must_use]
    pub fn from_definition(id: TypeId, definition: TypeDefinition, creator: Audit) -> Self {
        Self {
            id,
            name: definition.name,
            description: definition.description,
            properties: definition.properties,
            inheritance: definition.inheritance,
            validation: definition.validation,
            status: TypeStatus::Active,
            creator,
            metadata: definition.metadata,
        }
    }

    /// Returns true if the type accepts new assertions.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
