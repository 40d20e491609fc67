//! # kif-core
//!
//! The statement filter algebra for KIF - THE ALGEBRA.
//!
//! This crate decides which knowledge-graph statements match a pattern.
//! Statements follow the subject/property/value ("snak") model with ranks,
//! qualifiers and references. Patterns are [`Filter`]s built from
//! [`Fingerprint`] trees and type masks.
//!
//! ## Layers
//!
//! - `types`: the closed value model (values, snaks, statements) and errors
//! - `mask`: bit-flag sets over datatypes, ranks and snak variants
//! - `fingerprint`: predicates over a single value, with normalization
//! - `filter`: predicates over whole statements, with normalization,
//!   conjunction and matching
//!
//! ## Architectural Constraints
//!
//! - Pure functions over immutable trees: no I/O, no shared mutable state
//! - Integer arithmetic only
//! - Every fallible operation returns `Result<_, KifError>`
//!
//! ## Example
//!
//! ```
//! use kif_core::{Filter, Item, Property, Statement};
//!
//! let stmt = Statement::new(Item::new("x"), Property::new("p").snak(Item::new("y")));
//! let filter = Filter::new().with_property(Property::new("p"));
//! assert!(filter.matches(&stmt));
//! assert!(!filter.combine([&Filter::new().with_subject(Item::new("z"))]).matches(&stmt));
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod fingerprint;
pub mod filter;
pub mod mask;
pub mod primitives;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Annotations, ArgSite, Datatype, Decimal, Entity, ExternalId, Instant, Iri, Item, KifError,
    Lexeme, Property, PseudoProperty, Quantity, Rank, Snak, SnakKind, Statement, Str, Text, Time,
    TimePrecision, Value, ValueClass,
};

// =============================================================================
// RE-EXPORTS: Masks (from mask module)
// =============================================================================

pub use mask::{DatatypeMask, DatatypeMaskArg, RankMask, RankMaskArg, SnakMask, SnakMaskArg};

// =============================================================================
// RE-EXPORTS: Algebra
// =============================================================================

pub use filter::{FieldUpdate, Filter, FilterUpdate};
pub use fingerprint::Fingerprint;
