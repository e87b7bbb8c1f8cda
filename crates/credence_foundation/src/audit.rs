//! Caller identity and audit stamps.
//!
//! Every mutation records who performed it and when. The principal is an
//! opaque identity string supplied by the hosting runtime's authentication
//! layer; the timestamp comes from the runtime clock.

use std::fmt;

/// Opaque identity of an authenticated caller.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Creates a principal identity from its textual form.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point in time, in nanoseconds since the Unix epoch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from nanoseconds since the Unix epoch.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Returns nanoseconds since the Unix epoch.
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// Who created a record and when.
///
/// Captured once at creation and never changed afterwards; the principal
/// gates all later mutations of the record.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Audit {
    /// The authenticated caller.
    pub principal: PrincipalId,
    /// When the mutation happened.
    pub at: Timestamp,
}

impl Audit {
    /// Creates an audit stamp.
    #[must_use]
    pub fn new(principal: PrincipalId, at: Timestamp) -> Self {
        Self { principal, at }
    }
}
