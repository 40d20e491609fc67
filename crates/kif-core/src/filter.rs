//! # Filter Module
//!
//! Predicates over whole statements.
//!
//! A [`Filter`] pairs three fingerprints (subject, property, value) with
//! datatype masks for each, a snak mask, a rank mask, an optional language
//! and an annotation flag. Filters never change in place: `normalize`,
//! `combine`, `replace` and `unannotated` all return a new filter.
//!
//! ## Normalization
//!
//! The subject is normalized against ENTITY and the property against
//! PROPERTY. The value is normalized against its own mask narrowed by the
//! property's declared range, and the value mask is narrowed by what
//! survives. Narrowing the mask can make the value coerce again, so this step
//! repeats until neither changes. Finally the snak mask drops the variants
//! the value fingerprint rules out.

use crate::primitives::MAX_NORMALIZE_PASSES;
use crate::{
    ArgSite, DatatypeMask, DatatypeMaskArg, Fingerprint, KifError, RankMask, RankMaskArg, Snak,
    SnakMask, SnakMaskArg, Statement, Value,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// FIELD UPDATES
// =============================================================================

/// How [`Filter::replace`] treats one field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Leave the field as it is.
    #[default]
    Keep,
    /// Restore the field's default.
    Reset,
    /// Overwrite the field.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Transform the payload of a `Set`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldUpdate<U> {
        match self {
            Self::Keep => FieldUpdate::Keep,
            Self::Reset => FieldUpdate::Reset,
            Self::Set(value) => FieldUpdate::Set(f(value)),
        }
    }

    fn apply(self, current: T, default: T) -> T {
        match self {
            Self::Keep => current,
            Self::Reset => default,
            Self::Set(value) => value,
        }
    }
}

/// Field-by-field changes for [`Filter::replace`]. Every field defaults to `Keep`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterUpdate {
    pub subject: FieldUpdate<Fingerprint>,
    pub property: FieldUpdate<Fingerprint>,
    pub value: FieldUpdate<Fingerprint>,
    pub snak_mask: FieldUpdate<SnakMask>,
    pub subject_mask: FieldUpdate<DatatypeMask>,
    pub property_mask: FieldUpdate<DatatypeMask>,
    pub value_mask: FieldUpdate<DatatypeMask>,
    pub rank_mask: FieldUpdate<RankMask>,
    pub language: FieldUpdate<String>,
    pub annotated: FieldUpdate<bool>,
}

// =============================================================================
// FILTER
// =============================================================================

/// A predicate over statements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "FilterRepr")]
pub struct Filter {
    subject: Fingerprint,
    property: Fingerprint,
    value: Fingerprint,
    snak_mask: SnakMask,
    subject_mask: DatatypeMask,
    property_mask: DatatypeMask,
    value_mask: DatatypeMask,
    rank_mask: RankMask,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    annotated: bool,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            subject: Fingerprint::Full,
            property: Fingerprint::Full,
            value: Fingerprint::Full,
            snak_mask: SnakMask::ALL,
            subject_mask: DatatypeMask::ENTITY,
            property_mask: DatatypeMask::PROPERTY,
            value_mask: DatatypeMask::VALUE,
            rank_mask: RankMask::ALL,
            language: None,
            annotated: false,
        }
    }
}

impl Filter {
    /// The full filter: matches every statement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter for statements about `subject` shaped like `snak`.
    #[must_use]
    pub fn from_snak(subject: impl Into<Fingerprint>, snak: &Snak) -> Self {
        Self {
            subject: subject.into(),
            property: Fingerprint::from(snak.property().clone()),
            value: snak
                .value()
                .map_or(Fingerprint::Full, |value| Fingerprint::from(value.clone())),
            snak_mask: SnakMask::from(snak.kind()),
            ..Self::default()
        }
    }

    /// Filter for statements equal to `statement`, ignoring its annotations.
    #[must_use]
    pub fn from_statement(statement: &Statement) -> Self {
        Self::from_snak(statement.subject.clone(), &statement.snak)
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<Fingerprint>) -> Self {
        self.subject = subject.into();
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: impl Into<Fingerprint>) -> Self {
        self.property = property.into();
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Fingerprint>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_snak_mask(mut self, mask: impl Into<SnakMaskArg>) -> Result<Self, KifError> {
        self.snak_mask =
            SnakMask::check_at(mask, ArgSite::new("Filter::with_snak_mask", "snak_mask", 1))?;
        Ok(self)
    }

    pub fn with_subject_mask(mut self, mask: impl Into<DatatypeMaskArg>) -> Result<Self, KifError> {
        self.subject_mask = DatatypeMask::check_at(
            mask,
            ArgSite::new("Filter::with_subject_mask", "subject_mask", 1),
        )? & DatatypeMask::ENTITY;
        Ok(self)
    }

    pub fn with_property_mask(
        mut self,
        mask: impl Into<DatatypeMaskArg>,
    ) -> Result<Self, KifError> {
        self.property_mask = DatatypeMask::check_at(
            mask,
            ArgSite::new("Filter::with_property_mask", "property_mask", 1),
        )? & DatatypeMask::PROPERTY;
        Ok(self)
    }

    pub fn with_value_mask(mut self, mask: impl Into<DatatypeMaskArg>) -> Result<Self, KifError> {
        self.value_mask = DatatypeMask::check_at(
            mask,
            ArgSite::new("Filter::with_value_mask", "value_mask", 1),
        )? & DatatypeMask::VALUE;
        Ok(self)
    }

    pub fn with_rank_mask(mut self, mask: impl Into<RankMaskArg>) -> Result<Self, KifError> {
        self.rank_mask =
            RankMask::check_at(mask, ArgSite::new("Filter::with_rank_mask", "rank_mask", 1))?;
        Ok(self)
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_annotated(mut self, annotated: bool) -> Self {
        self.annotated = annotated;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn subject(&self) -> &Fingerprint {
        &self.subject
    }

    #[must_use]
    pub fn property(&self) -> &Fingerprint {
        &self.property
    }

    #[must_use]
    pub fn value(&self) -> &Fingerprint {
        &self.value
    }

    #[must_use]
    pub fn snak_mask(&self) -> SnakMask {
        self.snak_mask
    }

    /// Subject datatypes, always within ENTITY.
    #[must_use]
    pub fn subject_mask(&self) -> DatatypeMask {
        self.subject_mask & DatatypeMask::ENTITY
    }

    /// Property datatypes, always within PROPERTY.
    #[must_use]
    pub fn property_mask(&self) -> DatatypeMask {
        self.property_mask & DatatypeMask::PROPERTY
    }

    /// Value datatypes, always within VALUE.
    #[must_use]
    pub fn value_mask(&self) -> DatatypeMask {
        self.value_mask & DatatypeMask::VALUE
    }

    #[must_use]
    pub fn rank_mask(&self) -> RankMask {
        self.rank_mask
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Check if only annotated statements can match.
    #[must_use]
    pub fn annotated(&self) -> bool {
        self.annotated
    }

    // -------------------------------------------------------------------------
    // Transformations
    // -------------------------------------------------------------------------

    /// Copy this filter with some fields kept, reset or overwritten.
    #[must_use]
    pub fn replace(&self, update: FilterUpdate) -> Self {
        let default = Self::default();
        Self {
            subject: update.subject.apply(self.subject.clone(), default.subject),
            property: update.property.apply(self.property.clone(), default.property),
            value: update.value.apply(self.value.clone(), default.value),
            snak_mask: update.snak_mask.apply(self.snak_mask, default.snak_mask),
            subject_mask: update
                .subject_mask
                .apply(self.subject_mask, default.subject_mask)
                & DatatypeMask::ENTITY,
            property_mask: update
                .property_mask
                .apply(self.property_mask, default.property_mask)
                & DatatypeMask::PROPERTY,
            value_mask: update.value_mask.apply(self.value_mask, default.value_mask)
                & DatatypeMask::VALUE,
            rank_mask: update.rank_mask.apply(self.rank_mask, default.rank_mask),
            language: update
                .language
                .map(Some)
                .apply(self.language.clone(), default.language),
            annotated: update.annotated.apply(self.annotated, default.annotated),
        }
    }

    /// This filter without the annotation requirement.
    #[must_use]
    pub fn unannotated(&self) -> Self {
        if !self.annotated {
            return self.clone();
        }
        self.replace(FilterUpdate {
            annotated: FieldUpdate::Set(false),
            ..FilterUpdate::default()
        })
    }

    /// Canonicalize this filter. Idempotent.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let subject = self.subject.normalize(DatatypeMask::ENTITY);
        let subject_mask = self.subject_mask() & subject.datatype_mask();

        let property = self.property.normalize(DatatypeMask::PROPERTY);
        let property_mask = self.property_mask() & property.datatype_mask();

        let range = property.range_datatype_mask();
        let mut value = self.value.clone();
        let mut value_mask = self.value_mask();
        for _ in 0..MAX_NORMALIZE_PASSES {
            let next = value.normalize(value_mask & range);
            let next_mask = value_mask & next.datatype_mask();
            let stable = next == value && next_mask == value_mask;
            value = next;
            value_mask = next_mask;
            if stable {
                break;
            }
        }

        let snak_mask = if property_mask.is_empty() {
            SnakMask::EMPTY
        } else if value.is_empty() {
            self.snak_mask & !SnakMask::VALUE_SNAK
        } else if !value.is_full() {
            self.snak_mask & SnakMask::VALUE_SNAK
        } else {
            self.snak_mask
        };

        tracing::trace!(
            %subject_mask,
            %property_mask,
            %value_mask,
            %snak_mask,
            "filter normalized"
        );

        Self {
            subject,
            property,
            value,
            snak_mask,
            subject_mask,
            property_mask,
            value_mask,
            rank_mask: self.rank_mask,
            language: self.language.clone(),
            annotated: self.annotated,
        }
    }

    /// Check if the normalized filter matches every statement.
    #[must_use]
    pub fn is_full(&self) -> bool {
        let filter = self.normalize();
        filter.snak_mask == SnakMask::ALL
            && filter.subject.is_full()
            && filter.property.is_full()
            && filter.value.is_full()
            && filter.subject_mask() == DatatypeMask::ENTITY
            && filter.property_mask() == DatatypeMask::PROPERTY
            && filter.value_mask() == DatatypeMask::VALUE
    }

    /// Check if the normalized filter matches no statement.
    ///
    /// An empty value mask alone does not count: some-value and no-value
    /// statements carry no value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalize().is_empty_normalized()
    }

    fn is_empty_normalized(&self) -> bool {
        self.snak_mask.is_empty() || self.subject_mask().is_empty() || self.property_mask().is_empty()
    }

    /// Conjoin this filter with `others`, then normalize.
    ///
    /// The conjunction is taken field by field over the filters as given and
    /// normalized once at the end. Two conflicting values therefore leave an
    /// empty value and drop only `VALUE_SNAK`: the result still matches
    /// some-value and no-value statements.
    #[must_use]
    pub fn combine<'a>(&self, others: impl IntoIterator<Item = &'a Filter>) -> Self {
        others
            .into_iter()
            .fold(self.clone(), |acc, other| acc.conjoin(other))
            .normalize()
    }

    fn conjoin(self, other: &Filter) -> Self {
        let language = match (self.language, &other.language) {
            (None, right) => right.clone(),
            (Some(left), None) => Some(left),
            (Some(left), Some(right)) if left == *right => Some(left),
            (Some(left), Some(right)) => {
                tracing::debug!(%left, %right, "conflicting filter languages, dropping both");
                None
            }
        };
        Self {
            subject: self.subject & other.subject.clone(),
            property: self.property & other.property.clone(),
            value: self.value & other.value.clone(),
            snak_mask: self.snak_mask & other.snak_mask,
            subject_mask: self.subject_mask & other.subject_mask,
            property_mask: self.property_mask & other.property_mask,
            value_mask: self.value_mask & other.value_mask,
            rank_mask: self.rank_mask & other.rank_mask,
            language,
            annotated: self.annotated || other.annotated,
        }
    }

    // -------------------------------------------------------------------------
    // Matching
    // -------------------------------------------------------------------------

    /// Check whether `statement` satisfies this filter.
    #[must_use]
    pub fn matches(&self, statement: &Statement) -> bool {
        self.normalize().matches_normalized(statement)
    }

    /// Lazily keep the statements this filter matches.
    ///
    /// The filter is normalized once, up front.
    pub fn select<'a, I>(&self, statements: I) -> impl Iterator<Item = &'a Statement> + use<'a, I>
    where
        I: IntoIterator<Item = &'a Statement>,
    {
        let filter = self.normalize();
        statements
            .into_iter()
            .filter(move |statement| filter.matches_normalized(statement))
    }

    fn matches_normalized(&self, statement: &Statement) -> bool {
        if self.is_empty_normalized() {
            return false;
        }
        let snak = &statement.snak;
        if !self.snak_mask.intersects(SnakMask::from(snak.kind())) {
            return false;
        }

        let subject = Value::from(statement.subject.clone());
        if !self.subject_mask().overlaps(DatatypeMask::from(subject.datatype()))
            || !self.subject.matches_normalized(&subject)
        {
            return false;
        }

        let property = Value::from(snak.property().clone());
        if !self.property_mask().overlaps(DatatypeMask::from(property.datatype()))
            || !self.property.matches_normalized(&property)
        {
            return false;
        }

        match snak.value() {
            Some(value) => {
                if self.value.is_empty()
                    || !self.value_mask().overlaps(DatatypeMask::from(value.datatype()))
                    || !self.value.matches_normalized(value)
                {
                    return false;
                }
                if let (Some(language), Value::Text(text)) = (&self.language, value)
                    && text.language != *language
                {
                    return false;
                }
            }
            None => {
                if !(self.value.is_full() || self.value.is_empty()) {
                    return false;
                }
            }
        }

        if !self.annotated {
            return true;
        }
        statement
            .rank()
            .is_some_and(|rank| self.rank_mask.intersects(RankMask::from(rank)))
    }
}

// =============================================================================
// SERDE
// =============================================================================

/// Wire shape of a filter: every field optional, masks clamped on the way in.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FilterRepr {
    subject: Fingerprint,
    property: Fingerprint,
    value: Fingerprint,
    snak_mask: SnakMask,
    subject_mask: DatatypeMask,
    property_mask: DatatypeMask,
    value_mask: DatatypeMask,
    rank_mask: RankMask,
    language: Option<String>,
    annotated: bool,
}

impl Default for FilterRepr {
    fn default() -> Self {
        let Filter {
            subject,
            property,
            value,
            snak_mask,
            subject_mask,
            property_mask,
            value_mask,
            rank_mask,
            language,
            annotated,
        } = Filter::default();
        Self {
            subject,
            property,
            value,
            snak_mask,
            subject_mask,
            property_mask,
            value_mask,
            rank_mask,
            language,
            annotated,
        }
    }
}

impl From<FilterRepr> for Filter {
    fn from(repr: FilterRepr) -> Self {
        Self {
            subject: repr.subject,
            property: repr.property,
            value: repr.value,
            snak_mask: repr.snak_mask,
            subject_mask: repr.subject_mask & DatatypeMask::ENTITY,
            property_mask: repr.property_mask & DatatypeMask::PROPERTY,
            value_mask: repr.value_mask & DatatypeMask::VALUE,
            rank_mask: repr.rank_mask,
            language: repr.language,
            annotated: repr.annotated,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
