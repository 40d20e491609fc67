//! # Core Type Definitions
//!
//! This module contains the closed value model consumed by the filter algebra:
//! - Values (`Item`, `Property`, `Lexeme`, `Iri`, `Text`, `Str`, `ExternalId`,
//!   `Quantity`, `Time`) unified in the `Value` enum
//! - Value kinds (`Datatype`) and umbrella classes (`ValueClass`)
//! - Claim shapes (`Snak`), ranks and statements
//! - Error types (`KifError`) and argument sites (`ArgSite`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Are immutable once built and compare structurally
//! - Implement `Hash` so fingerprints and filters can be deduplicated

mod decimal;
mod statement;
mod time;
mod value;

pub use decimal::Decimal;
pub use statement::{Annotations, PseudoProperty, Rank, Snak, SnakKind, Statement};
pub use time::{Instant, Time, TimePrecision};
pub use value::{
    Datatype, Entity, ExternalId, Iri, Item, Lexeme, Property, Quantity, Str, Text, Value,
    ValueClass,
};

use std::fmt;
use thiserror::Error;

// =============================================================================
// ARGUMENT SITES
// =============================================================================

/// Location of an argument inside a call, reported by coercion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgSite {
    /// The operation that received the argument.
    pub function: &'static str,
    /// The argument name.
    pub argument: &'static str,
    /// 1-based argument position.
    pub position: usize,
}

impl ArgSite {
    /// Create a new argument site.
    #[must_use]
    pub const fn new(function: &'static str, argument: &'static str, position: usize) -> Self {
        Self {
            function,
            argument,
            position,
        }
    }
}

impl fmt::Display for ArgSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bad argument #{} ({}) to '{}'",
            self.position, self.argument, self.function
        )
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the KIF filter algebra.
///
/// - No silent failures, except the one documented fallback in
///   `Fingerprint::normalize`
/// - Use `Result<T, KifError>` for fallible operations
/// - The algebra never panics; all errors are recoverable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KifError {
    /// An argument could not be coerced into the expected type.
    #[error("{site}: cannot coerce {value} into {expected}")]
    Coercion {
        /// Debug rendering of the rejected argument.
        value: String,
        /// Name of the expected type or class.
        expected: &'static str,
        /// Where the argument was passed.
        site: ArgSite,
    },

    /// The input has an acceptable shape but an invalid meaning.
    #[error("invalid value in '{function}': {reason}")]
    InvalidValue {
        /// The operation that rejected the input.
        function: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl KifError {
    /// Build a coercion error for `value`.
    pub fn coercion(value: impl fmt::Debug, expected: &'static str, site: ArgSite) -> Self {
        Self::Coercion {
            value: format!("{:?}", value),
            expected,
            site,
        }
    }

    /// Build an invalid-value error.
    pub fn invalid(function: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            function,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
