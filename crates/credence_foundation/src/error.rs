//! Error types for the Credence system.
//!
//! Uses `thiserror` for ergonomic error definition. Every public operation
//! returns [`Result`]; errors bubble up unchanged through the layers, and the
//! kernel never panics on user-originated input.

use std::fmt;

use thiserror::Error;

/// A convenient alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Credence operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound(message.into()))
    }

    /// Creates an already-exists error.
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists(message.into()))
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(code: ValidationCode, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation(ValidationFailure {
            code,
            message: message.into(),
            violation: None,
        }))
    }

    /// Creates a validation error carrying a structured violation.
    #[must_use]
    pub fn validation_with(
        code: ValidationCode,
        message: impl Into<String>,
        violation: Violation,
    ) -> Self {
        Self::new(ErrorKind::Validation(ValidationFailure {
            code,
            message: message.into(),
            violation: Some(violation),
        }))
    }

    /// Creates an invalid-operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation(message.into()))
    }

    /// Creates a permission-denied error.
    #[must_use]
    pub fn permission_denied(
        operation: impl Into<String>,
        resource: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::PermissionDenied {
            operation: operation.into(),
            resource: resource.into(),
            reason: reason.into(),
        })
    }

    /// Creates an invalid-confidence error.
    ///
    /// Kept distinct from probability validation so callers can tell the two
    /// weight inputs apart.
    #[must_use]
    pub fn invalid_confidence(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfidence {
            value: value.into(),
            reason: reason.into(),
        })
    }

    /// Creates a system error.
    #[must_use]
    pub fn system(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::System(message.into()))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization(message.into()))
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io(message.into()))
    }

    /// Returns the validation code if this is a validation error.
    #[must_use]
    pub fn validation_code(&self) -> Option<&ValidationCode> {
        match &self.kind {
            ErrorKind::Validation(failure) => Some(&failure.code),
            _ => None,
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A referenced concept, relationship, or type does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint was violated.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A rule or logical law rejected the input.
    #[error("validation failed: {0}")]
    Validation(ValidationFailure),

    /// The operation is not meaningful in the current state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A mutation was attempted by someone other than the record's creator.
    #[error("permission denied: cannot {operation} {resource} ({reason})")]
    PermissionDenied {
        /// The attempted operation, e.g. `modify`.
        operation: String,
        /// The kind of resource, e.g. `concept`.
        resource: String,
        /// Why the caller was rejected.
        reason: String,
    },

    /// A confidence input failed the fraction invariant.
    #[error("invalid confidence {value}: {reason}")]
    InvalidConfidence {
        /// The offending input, rendered as text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A host-runtime failure propagated upward.
    #[error("system error: {0}")]
    System(String),

    /// Snapshot encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File I/O failed.
    #[error("io error: {0}")]
    Io(String),
}

/// Structured payload of a validation error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationFailure {
    /// The machine-readable failure code.
    pub code: ValidationCode,
    /// A human-readable description.
    pub message: String,
    /// The specific field violation, when one can be named.
    pub violation: Option<Violation>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(violation) = &self.violation {
            write!(f, " ({violation})")?;
        }
        Ok(())
    }
}

/// A single field-level constraint violation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violation {
    /// Which field was rejected.
    pub field: String,
    /// The constraint that failed.
    pub constraint: String,
    /// The offending value, rendered as text.
    pub value: String,
}

impl Violation {
    /// Creates a violation record.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field {}: expected {}, got {}",
            self.field, self.constraint, self.value
        )
    }
}

/// Machine-readable validation failure codes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationCode {
    /// The relationship type has been deprecated.
    DeprecatedType,
    /// An irreflexive type was asserted with identical endpoints.
    IrreflexiveViolation,
    /// A `NoSelfReference` rule was violated.
    SelfReference,
    /// A `RequiredMetadata` rule found a missing key.
    RequiredMetadata,
    /// A `UniqueTarget` rule found a duplicate edge.
    UniqueTarget,
    /// A fraction input fell outside `[0, 1]`.
    OutOfRange,
    /// A required name was empty.
    EmptyName,
    /// A user-defined rule fired; carries its error code.
    Custom(String),
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeprecatedType => f.write_str("DEPRECATED_TYPE"),
            Self::IrreflexiveViolation => f.write_str("IRREFLEXIVE_VIOLATION"),
            Self::SelfReference => f.write_str("SELF_REFERENCE"),
            Self::RequiredMetadata => f.write_str("REQUIRED_METADATA"),
            Self::UniqueTarget => f.write_str("UNIQUE_TARGET"),
            Self::OutOfRange => f.write_str("OUT_OF_RANGE"),
            Self::EmptyName => f.write_str("EMPTY_NAME"),
            Self::Custom(code) => f.write_str(code),
        }
    }
}
