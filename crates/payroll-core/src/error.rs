//! # Error Hierarchy
//!
//! Structured error types for regulation derivation, built with `thiserror`.
//!
//! The resolver performs no I/O and never retries. Every failure is
//! deterministic and propagates to the caller:
//!
//! - **Invalid argument**: missing candidate lists, non-positive identifiers,
//!   blank names or key filters.
//! - **Unknown reference**: a candidate or payroll layer points at a
//!   regulation that cannot be found.
//! - **Unsupported override**: a requested override type has no semantics.

use thiserror::Error;

/// Top-level error type for payroll regulation derivation.
#[derive(Error, Debug)]
pub enum PayrollError {
    /// An argument was rejected before any work was done.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced object could not be resolved.
    #[error("unknown {kind} reference {reference:?}: {context}")]
    UnknownReference {
        /// What kind of object was referenced (e.g. "regulation").
        kind: String,
        /// The reference that failed to resolve.
        reference: String,
        /// Where the reference was found.
        context: String,
    },

    /// The requested override type has no matching semantics.
    #[error("unsupported override type {requested:?}")]
    UnsupportedOverride {
        /// The raw requested value.
        requested: String,
    },

    /// A payroll layer uses a regulation owned by another tenant that is
    /// not flagged as shared.
    #[error("regulation {regulation} of tenant {owner} is not shared with tenant {tenant}")]
    ForeignRegulation {
        /// The offending regulation.
        regulation: String,
        /// The tenant owning the regulation.
        owner: String,
        /// The tenant of the payroll.
        tenant: String,
    },

    /// Serialization/deserialization error (configuration, bundles).
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PayrollError {
    /// Convenience constructor for [`PayrollError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Convenience constructor for [`PayrollError::UnknownReference`].
    pub fn unknown(
        kind: impl Into<String>,
        reference: impl std::fmt::Display,
        context: impl Into<String>,
    ) -> Self {
        Self::UnknownReference {
            kind: kind.into(),
            reference: reference.to_string(),
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for PayrollError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for derivation operations.
pub type PayrollResult<T> = Result<T, PayrollError>;
