//! # Innate Primitives
//!
//! Hardcoded constants for the KIF filter algebra.
//!
//! These values are compiled into the binary and are immutable at runtime.
//!
//! ## Primitives
//!
//! 1. **Vocabulary**: IRIs of the pseudo-properties excluded from entity matching.
//! 2. **Defaults**: the language assumed for texts built without one.
//! 3. **Bounds**: limits that keep parsing and normalization computationally bounded.

// =============================================================================
// PSEUDO-PROPERTY VOCABULARY
// =============================================================================

/// IRI of the label pseudo-property.
pub const LABEL_IRI: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// IRI of the alias pseudo-property.
pub const ALIAS_IRI: &str = "http://www.w3.org/2004/02/skos/core#altLabel";

/// IRI of the description pseudo-property.
pub const DESCRIPTION_IRI: &str = "http://schema.org/description";

/// IRI of the lemma pseudo-property (lexemes only).
pub const LEMMA_IRI: &str = "http://wikiba.se/ontology#lemma";

/// IRI of the language pseudo-property (lexemes only).
pub const LANGUAGE_IRI: &str = "http://purl.org/dc/terms/language";

// =============================================================================
// DEFAULTS
// =============================================================================

/// Language tag given to a `Text` constructed without an explicit language.
pub const DEFAULT_LANGUAGE: &str = "en";

// =============================================================================
// BOUNDS
// =============================================================================

/// Highest valid time precision (seconds).
pub const MAX_TIME_PRECISION: u8 = 14;

/// Largest UTC offset accepted for an instant or a time zone, in seconds.
///
/// Offsets must stay strictly inside one day.
pub const MAX_UTC_OFFSET_SECONDS: i32 = 86_399;

/// Maximum number of significant digits in a decimal literal.
///
/// `i128` holds every 38-digit integer; longer literals are rejected.
pub const MAX_DECIMAL_DIGITS: usize = 38;

/// Upper bound on filter value-normalization passes.
///
/// Each pass can only shrink the value mask, and a mask has at most nine
/// flags, so a fixpoint is always reached well before this bound.
pub const MAX_NORMALIZE_PASSES: usize = 12;
