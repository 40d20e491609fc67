//! Snaks, ranks and statements.

use super::{Datatype, Entity, Property, Value};
use crate::primitives::{ALIAS_IRI, DESCRIPTION_IRI, LABEL_IRI, LANGUAGE_IRI, LEMMA_IRI};
use serde::{Deserialize, Serialize};

// =============================================================================
// SNAK
// =============================================================================

/// An atomic claim shape about some subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Snak {
    /// The property has the given value.
    Value { property: Property, value: Value },
    /// The property has some unspecified value.
    SomeValue { property: Property },
    /// The property has no value.
    NoValue { property: Property },
}

/// Tag of a [`Snak`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnakKind {
    Value,
    SomeValue,
    NoValue,
}

impl Snak {
    /// The snak's variant tag.
    #[must_use]
    pub fn kind(&self) -> SnakKind {
        match self {
            Self::Value { .. } => SnakKind::Value,
            Self::SomeValue { .. } => SnakKind::SomeValue,
            Self::NoValue { .. } => SnakKind::NoValue,
        }
    }

    /// The snak's property.
    #[must_use]
    pub fn property(&self) -> &Property {
        match self {
            Self::Value { property, .. }
            | Self::SomeValue { property }
            | Self::NoValue { property } => property,
        }
    }

    /// The snak's value, for value snaks.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value { value, .. } => Some(value),
            Self::SomeValue { .. } | Self::NoValue { .. } => None,
        }
    }
}

// =============================================================================
// RANK
// =============================================================================

/// Rank of an annotated statement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Preferred,
    #[default]
    Normal,
    Deprecated,
}

// =============================================================================
// STATEMENT
// =============================================================================

/// Qualifiers, references and rank attached to a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Annotations {
    pub rank: Rank,
    pub qualifiers: Vec<Snak>,
    /// Each reference is a record of snaks.
    pub references: Vec<Vec<Snak>>,
}

impl Annotations {
    /// Create annotations with the given rank and no qualifiers or references.
    #[must_use]
    pub fn with_rank(rank: Rank) -> Self {
        Self {
            rank,
            ..Self::default()
        }
    }
}

/// A statement: a subject entity and a snak, optionally annotated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Entity,
    pub snak: Snak,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl Statement {
    /// Create an unannotated statement.
    #[must_use]
    pub fn new(subject: impl Into<Entity>, snak: Snak) -> Self {
        Self {
            subject: subject.into(),
            snak,
            annotations: None,
        }
    }

    /// Attach annotations.
    #[must_use]
    pub fn annotated(mut self, annotations: Annotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Check if the statement carries annotations.
    #[must_use]
    pub fn is_annotated(&self) -> bool {
        self.annotations.is_some()
    }

    /// The rank, for annotated statements.
    #[must_use]
    pub fn rank(&self) -> Option<Rank> {
        self.annotations.as_ref().map(|a| a.rank)
    }
}

// =============================================================================
// PSEUDO-PROPERTIES
// =============================================================================

/// Synthetic properties standing for entity metadata rather than claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PseudoProperty {
    Label,
    Alias,
    Description,
    Lemma,
    Language,
}

impl PseudoProperty {
    /// Get the pseudo-property's IRI.
    #[must_use]
    pub fn iri(&self) -> &'static str {
        match self {
            Self::Label => LABEL_IRI,
            Self::Alias => ALIAS_IRI,
            Self::Description => DESCRIPTION_IRI,
            Self::Lemma => LEMMA_IRI,
            Self::Language => LANGUAGE_IRI,
        }
    }

    /// Look up the pseudo-property with the given IRI.
    #[must_use]
    pub fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            LABEL_IRI => Some(Self::Label),
            ALIAS_IRI => Some(Self::Alias),
            DESCRIPTION_IRI => Some(Self::Description),
            LEMMA_IRI => Some(Self::Lemma),
            LANGUAGE_IRI => Some(Self::Language),
            _ => None,
        }
    }

    /// The pseudo-property as a property with its declared range.
    #[must_use]
    pub fn property(&self) -> Property {
        let range = match self {
            Self::Label | Self::Alias | Self::Description | Self::Lemma => Datatype::Text,
            Self::Language => Datatype::Item,
        };
        Property::with_range(self.iri(), range)
    }
}

// =============================================================================
// TESTS
// =============================================================================
