//! # Fingerprint Module
//!
//! Symbolic predicates over single values.
//!
//! A fingerprint is a finite tree: the atoms `Full`, `Empty`, `Value`, `Snak`
//! and `ConverseSnak`, combined by `And`/`Or`. The `&` and `|` operators build
//! compounds structurally; all simplification happens in [`Fingerprint::normalize`].
//!
//! Matching is shallow: a `Snak` fingerprint accepts any non-pseudo entity
//! without checking that the snak holds for it. Deciding that belongs to
//! whatever evaluates the filter against a store.

use crate::{
    Datatype, DatatypeMask, Entity, ExternalId, Iri, Item, Lexeme, Property, Quantity, Snak, Str,
    Text, Time, Value, ValueClass,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::{BitAnd, BitOr};

// =============================================================================
// FINGERPRINT
// =============================================================================

/// A predicate over a single value or entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Fingerprint {
    /// Matches any value.
    #[default]
    Full,
    /// Matches nothing.
    Empty,
    /// Matches exactly this value, modulo wildcard fields of deep values.
    Value(Value),
    /// Matches an entity that could be the subject of this snak.
    Snak(Snak),
    /// Matches a value that could be the object of this snak.
    ConverseSnak(Snak),
    /// Matches when every child matches.
    And(Vec<Fingerprint>),
    /// Matches when some child matches.
    Or(Vec<Fingerprint>),
}

impl Fingerprint {
    /// Fingerprint of the values `snak` points to.
    #[must_use]
    pub fn converse(snak: Snak) -> Self {
        Self::ConverseSnak(snak)
    }

    /// Conjunction of `children`, without simplification.
    #[must_use]
    pub fn and(children: impl IntoIterator<Item = Fingerprint>) -> Self {
        Self::And(children.into_iter().collect())
    }

    /// Disjunction of `children`, without simplification.
    #[must_use]
    pub fn or(children: impl IntoIterator<Item = Fingerprint>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    /// Check if this is the `Full` variant.
    #[must_use]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Check if this is the `Empty` variant.
    ///
    /// This is a tag test. `And` of two distinct values is not empty until
    /// normalized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Datatypes of the values this fingerprint can match.
    ///
    /// A value pattern also covers the subtypes of its datatype, and an empty
    /// compound covers everything since it normalizes to `Full`.
    #[must_use]
    pub fn datatype_mask(&self) -> DatatypeMask {
        match self {
            Self::Full => DatatypeMask::VALUE,
            Self::Empty => DatatypeMask::EMPTY,
            Self::Value(value) => subtypes_mask(value.datatype()),
            Self::Snak(_) => DatatypeMask::ENTITY,
            Self::ConverseSnak(snak) => match snak.value() {
                Some(value) if value.is_entity() => DatatypeMask::VALUE,
                _ => DatatypeMask::EMPTY,
            },
            Self::And(children) => children
                .iter()
                .fold(DatatypeMask::ALL, |mask, child| mask & child.datatype_mask()),
            Self::Or(children) if children.is_empty() => DatatypeMask::VALUE,
            Self::Or(children) => children
                .iter()
                .fold(DatatypeMask::EMPTY, |mask, child| mask | child.datatype_mask()),
        }
    }

    /// Datatypes of the values a property matched by this fingerprint can take.
    #[must_use]
    pub fn range_datatype_mask(&self) -> DatatypeMask {
        match self {
            Self::Full | Self::Snak(_) | Self::ConverseSnak(_) => DatatypeMask::VALUE,
            Self::Empty => DatatypeMask::EMPTY,
            Self::Value(Value::Property(property)) => property
                .range
                .map_or(DatatypeMask::VALUE, DatatypeMask::from),
            Self::Value(_) => DatatypeMask::EMPTY,
            Self::And(children) => children.iter().fold(DatatypeMask::ALL, |mask, child| {
                mask & child.range_datatype_mask()
            }),
            Self::Or(children) if children.is_empty() => DatatypeMask::VALUE,
            Self::Or(children) => children.iter().fold(DatatypeMask::EMPTY, |mask, child| {
                mask | child.range_datatype_mask()
            }),
        }
    }

    /// Canonicalize this fingerprint, restricted to the datatypes in `mask`.
    ///
    /// The result has no nested same-type compounds, no duplicate children,
    /// no neutral children and no compound with fewer than two children.
    /// Normalizing twice against the same mask changes nothing.
    #[must_use]
    pub fn normalize(&self, mask: DatatypeMask) -> Fingerprint {
        match self {
            Self::Full if mask.is_empty() => Self::Empty,
            Self::Full => Self::Full,
            Self::Empty => Self::Empty,
            Self::Value(value) => normalize_value(value, mask),
            Self::Snak(_) | Self::ConverseSnak(_) => {
                if self.datatype_mask().intersects(mask) {
                    self.clone()
                } else {
                    Self::Empty
                }
            }
            Self::And(children) => Junction::And.normalize(children, mask),
            Self::Or(children) => Junction::Or.normalize(children, mask),
        }
    }

    /// Check whether `value` satisfies this fingerprint.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        self.normalize(DatatypeMask::ALL).matches_normalized(value)
    }

    pub(crate) fn matches_normalized(&self, value: &Value) -> bool {
        match self {
            Self::Full => true,
            Self::Empty => false,
            Self::And(children) => children.iter().all(|child| child.matches_normalized(value)),
            Self::Or(children) => children.iter().any(|child| child.matches_normalized(value)),
            Self::Snak(_) => !value.is_pseudo_property() && value.is_entity(),
            Self::ConverseSnak(_) => {
                !value.is_pseudo_property()
                    && self
                        .datatype_mask()
                        .overlaps(DatatypeMask::from(value.datatype()))
            }
            Self::Value(pattern) => value_matches(pattern, value),
        }
    }
}

fn subtypes_mask(datatype: Datatype) -> DatatypeMask {
    Datatype::ALL
        .iter()
        .filter(|sub| sub.is_subtype_of(datatype))
        .fold(DatatypeMask::EMPTY, |mask, sub| mask | DatatypeMask::from(*sub))
}

fn normalize_value(value: &Value, mask: DatatypeMask) -> Fingerprint {
    if DatatypeMask::from(value.datatype()).intersects(mask) {
        return Fingerprint::Value(value.clone());
    }
    let Some(class) = mask.to_value_class() else {
        return Fingerprint::Empty;
    };
    match value.coerce_into(class) {
        Ok(coerced) => Fingerprint::Value(coerced),
        Err(err) => {
            tracing::debug!(%mask, %err, "value fingerprint dropped during normalization");
            Fingerprint::Empty
        }
    }
}

/// Compare `value` against `pattern`; unset fields of deep patterns are wildcards.
fn value_matches(pattern: &Value, value: &Value) -> bool {
    let expected = pattern.datatype();
    let value = if value.datatype() == expected {
        Cow::Borrowed(value)
    } else if value.datatype().is_subtype_of(expected) {
        match value.coerce_into(ValueClass::Concrete(expected)) {
            Ok(coerced) => Cow::Owned(coerced),
            Err(_) => return false,
        }
    } else {
        return false;
    };
    match (pattern, value.as_ref()) {
        (Value::Property(pattern), Value::Property(property)) => {
            pattern.iri == property.iri
                && match (pattern.range, property.range) {
                    (Some(expected), Some(actual)) => expected == actual,
                    _ => true,
                }
        }
        (Value::Quantity(pattern), Value::Quantity(quantity)) => pattern.matches(quantity),
        (Value::Time(pattern), Value::Time(time)) => pattern.matches(time),
        (pattern, value) => pattern == value,
    }
}

// =============================================================================
// COMPOUND NORMALIZATION
// =============================================================================

/// The two compound kinds, described by their neutral and absorbing atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Junction {
    And,
    Or,
}

impl Junction {
    fn neutral(self) -> Fingerprint {
        match self {
            Self::And => Fingerprint::Full,
            Self::Or => Fingerprint::Empty,
        }
    }

    fn absorbing(self) -> Fingerprint {
        match self {
            Self::And => Fingerprint::Empty,
            Self::Or => Fingerprint::Full,
        }
    }

    /// Children of `fp` if it is a compound of this kind.
    fn children(self, fp: &Fingerprint) -> Option<&[Fingerprint]> {
        match (self, fp) {
            (Self::And, Fingerprint::And(children)) | (Self::Or, Fingerprint::Or(children)) => {
                Some(children)
            }
            _ => None,
        }
    }

    fn build(self, children: Vec<Fingerprint>) -> Fingerprint {
        match self {
            Self::And => Fingerprint::And(children),
            Self::Or => Fingerprint::Or(children),
        }
    }

    fn normalize(self, children: &[Fingerprint], mask: DatatypeMask) -> Fingerprint {
        if mask.is_empty() {
            return Fingerprint::Empty;
        }
        match children {
            [] => return Fingerprint::Full,
            [only] => return only.normalize(mask),
            _ => {}
        }

        let absorbing = self.absorbing();
        let neutral = self.neutral();
        let mut survivors: Vec<Fingerprint> = Vec::with_capacity(children.len());
        for child in children {
            let child = child.normalize(mask);
            // a normalized same-kind compound is already flat
            let spliced = match self.children(&child) {
                Some(grandchildren) => grandchildren.to_vec(),
                None => vec![child],
            };
            for fp in spliced {
                if fp == absorbing {
                    return absorbing;
                }
                if fp != neutral && !survivors.contains(&fp) {
                    survivors.push(fp);
                }
            }
        }

        if survivors.len() <= 1 {
            return survivors.pop().unwrap_or(neutral);
        }
        if self == Self::And
            && survivors
                .iter()
                .filter(|fp| matches!(fp, Fingerprint::Value(_)))
                .nth(1)
                .is_some()
        {
            // two distinct exact values cannot both hold
            return Fingerprint::Empty;
        }
        self.build(survivors)
    }
}

// =============================================================================
// CONVERSIONS & OPERATORS
// =============================================================================

macro_rules! value_fingerprint_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Fingerprint {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )+
    };
}

value_fingerprint_from!(Item, Property, Lexeme, Iri, Text, Str, ExternalId, Quantity, Time, Entity);

impl From<Value> for Fingerprint {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Snak> for Fingerprint {
    fn from(snak: Snak) -> Self {
        Self::Snak(snak)
    }
}

impl<T: Into<Fingerprint>> BitAnd<T> for Fingerprint {
    type Output = Fingerprint;

    fn bitand(self, rhs: T) -> Fingerprint {
        Fingerprint::And(vec![self, rhs.into()])
    }
}

impl<T: Into<Fingerprint>> BitOr<T> for Fingerprint {
    type Output = Fingerprint;

    fn bitor(self, rhs: T) -> Fingerprint {
        Fingerprint::Or(vec![self, rhs.into()])
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decimal, PseudoProperty};

    fn item(iri: &str) -> Fingerprint {
        Fingerprint::from(Item::new(iri))
    }

    #[test]
    fn operators_build_without_simplifying() {
        let fp = item("x") & Fingerprint::Full;
        assert_eq!(fp, Fingerprint::And(vec![item("x"), Fingerprint::Full]));
        let fp = Fingerprint::Empty | Item::new("y");
        assert_eq!(fp, Fingerprint::Or(vec![Fingerprint::Empty, item("y")]));
    }

    #[test]
    fn variant_tests_are_tag_tests() {
        assert!(Fingerprint::Full.is_full());
        assert!(Fingerprint::Empty.is_empty());
        assert!(!(item("x") & item("y")).is_empty());
        assert!(!Fingerprint::or([]).is_full());
    }

    #[test]
    fn datatype_masks() {
        let p = Property::new("p");
        assert_eq!(item("x").datatype_mask(), DatatypeMask::ITEM);
        assert_eq!(
            Fingerprint::from(p.snak(Item::new("y"))).datatype_mask(),
            DatatypeMask::ENTITY
        );
        assert_eq!(
            Fingerprint::converse(p.snak(Item::new("y"))).datatype_mask(),
            DatatypeMask::VALUE
        );
        assert_eq!(
            Fingerprint::converse(p.snak("y")).datatype_mask(),
            DatatypeMask::EMPTY
        );
        assert_eq!(
            (item("x") | Fingerprint::from(Text::new("t"))).datatype_mask(),
            DatatypeMask::ITEM | DatatypeMask::TEXT
        );
        assert_eq!(
            (item("x") & Fingerprint::from(Text::new("t"))).datatype_mask(),
            DatatypeMask::EMPTY
        );
        assert_eq!(Fingerprint::and([]).datatype_mask(), DatatypeMask::ALL);
        assert_eq!(Fingerprint::or([]).datatype_mask(), DatatypeMask::VALUE);
    }

    #[test]
    fn masks_cover_every_matched_value() {
        let external = Value::from(ExternalId::new("a"));
        let fp = Fingerprint::from(Str::new("a"))
            & (Fingerprint::from(ExternalId::new("a")) | Item::new("b"));
        assert!(fp.matches(&external));
        assert_eq!(fp.datatype_mask(), DatatypeMask::EXTERNAL_ID);

        let string = Fingerprint::from(Str::new("a"));
        assert!(string.matches(&external));
        assert_eq!(
            string.datatype_mask(),
            DatatypeMask::STRING | DatatypeMask::EXTERNAL_ID
        );

        let empty_or = Fingerprint::or([]);
        assert!(empty_or.matches(&Value::from(Item::new("x"))));
        assert!(empty_or.matches(&external));
        assert_eq!(empty_or.range_datatype_mask(), DatatypeMask::VALUE);
    }

    #[test]
    fn range_masks() {
        let ranged = Fingerprint::from(Property::with_range("p", Datatype::Quantity));
        assert_eq!(ranged.range_datatype_mask(), DatatypeMask::QUANTITY);
        assert_eq!(
            Fingerprint::from(Property::new("p")).range_datatype_mask(),
            DatatypeMask::VALUE
        );
        assert_eq!(item("x").range_datatype_mask(), DatatypeMask::EMPTY);
        assert_eq!(Fingerprint::Full.range_datatype_mask(), DatatypeMask::VALUE);
    }

    #[test]
    fn atoms_outside_the_mask_become_empty() {
        assert_eq!(item("x").normalize(DatatypeMask::DATA_VALUE), Fingerprint::Empty);
        assert_eq!(item("x").normalize(DatatypeMask::ENTITY), item("x"));
        let snak = Fingerprint::from(Property::new("p").no_value());
        assert_eq!(snak.normalize(DatatypeMask::TEXT), Fingerprint::Empty);
        assert_eq!(Fingerprint::Full.normalize(DatatypeMask::EMPTY), Fingerprint::Empty);
        assert_eq!(Fingerprint::Full.normalize(DatatypeMask::ITEM), Fingerprint::Full);
    }

    #[test]
    fn value_normalization_coerces_strings() {
        let id = Fingerprint::from(ExternalId::new("y"));
        assert_eq!(
            id.normalize(DatatypeMask::STRING),
            Fingerprint::from(Str::new("y"))
        );
        let s = Fingerprint::from(Str::new("y"));
        assert_eq!(s.normalize(DatatypeMask::EXTERNAL_ID), id);
        // no class for this mask
        assert_eq!(
            s.normalize(DatatypeMask::ITEM | DatatypeMask::TIME),
            Fingerprint::Empty
        );
    }

    #[test]
    fn value_normalization_converts_lexical_values() {
        assert_eq!(
            Fingerprint::from(Str::new("x")).normalize(DatatypeMask::TEXT),
            Fingerprint::from(Text::new("x"))
        );
        assert_eq!(
            Fingerprint::from(Iri::new("x")).normalize(DatatypeMask::ENTITY),
            item("x")
        );
        assert_eq!(
            Fingerprint::from(Str::new("p")).normalize(DatatypeMask::PROPERTY),
            Fingerprint::from(Property::new("p"))
        );
        // converted values are already inside the mask
        let once = Fingerprint::from(ExternalId::new("x")).normalize(DatatypeMask::IRI);
        assert_eq!(once, Fingerprint::from(Iri::new("x")));
        assert_eq!(once.normalize(DatatypeMask::IRI), once);
        assert_eq!(
            Fingerprint::from(Iri::new("x")).normalize(DatatypeMask::TEXT),
            Fingerprint::Empty
        );
    }

    #[test]
    fn compound_edge_cases() {
        assert_eq!(Fingerprint::and([]).normalize(DatatypeMask::ALL), Fingerprint::Full);
        assert_eq!(Fingerprint::or([]).normalize(DatatypeMask::ALL), Fingerprint::Full);
        assert_eq!(
            Fingerprint::or([item("x")]).normalize(DatatypeMask::ALL),
            item("x")
        );
        assert_eq!(
            Fingerprint::and([item("x")]).normalize(DatatypeMask::EMPTY),
            Fingerprint::Empty
        );
        assert_eq!(
            (Fingerprint::Full & Fingerprint::Full).normalize(DatatypeMask::ALL),
            Fingerprint::Full
        );
        assert_eq!(
            (Fingerprint::Empty | Fingerprint::Empty).normalize(DatatypeMask::ALL),
            Fingerprint::Empty
        );
    }

    #[test]
    fn compound_flattens_and_deduplicates() {
        let snak_p = Fingerprint::from(Property::new("p").some_value());
        let snak_q = Fingerprint::from(Property::new("q").no_value());
        let nested = (snak_p.clone() & (snak_q.clone() & Fingerprint::Full)) & snak_p.clone();
        assert_eq!(
            nested.normalize(DatatypeMask::ALL),
            Fingerprint::And(vec![snak_p.clone(), snak_q.clone()])
        );

        let nested = (item("x") | (item("y") | Fingerprint::Empty)) | item("x");
        assert_eq!(
            nested.normalize(DatatypeMask::ALL),
            Fingerprint::Or(vec![item("x"), item("y")])
        );
    }

    #[test]
    fn compound_short_circuits() {
        let fp = item("x") & (item("y") | Fingerprint::Full) & Fingerprint::Empty;
        assert_eq!(fp.normalize(DatatypeMask::ALL), Fingerprint::Empty);
        let fp = item("x") | Fingerprint::Full;
        assert_eq!(fp.normalize(DatatypeMask::ALL), Fingerprint::Full);
    }

    #[test]
    fn distinct_values_contradict() {
        assert_eq!(
            (item("x") & item("y")).normalize(DatatypeMask::ALL),
            Fingerprint::Empty
        );
        assert_eq!(
            (item("x") & item("x")).normalize(DatatypeMask::ALL),
            item("x")
        );
    }

    #[test]
    fn mixed_compound_survives() {
        let snak = Fingerprint::from(Property::new("p").some_value());
        let fp = item("x") & snak.clone();
        assert_eq!(fp.normalize(DatatypeMask::ALL), fp);
        // the mask drops the item and leaves the snak
        let fp = (item("x") | Fingerprint::from(Text::new("t"))) & snak.clone();
        assert_eq!(
            fp.normalize(DatatypeMask::TEXT | DatatypeMask::LEXEME),
            Fingerprint::And(vec![Fingerprint::from(Text::new("t")), snak])
        );
    }

    #[test]
    fn snak_matches_non_pseudo_entities() {
        let fp = Fingerprint::from(Property::new("p").snak(Item::new("y")));
        assert!(fp.matches(&Value::from(Item::new("anything"))));
        assert!(fp.matches(&Value::from(Property::new("q"))));
        assert!(!fp.matches(&Value::from(PseudoProperty::Label.property())));
        assert!(!fp.matches(&Value::from(Text::new("t"))));
    }

    #[test]
    fn converse_snak_matches_by_mask() {
        let p = Property::new("p");
        let fp = Fingerprint::converse(p.snak(Item::new("y")));
        assert!(fp.matches(&Value::from(Text::new("t"))));
        assert!(!fp.matches(&Value::from(PseudoProperty::Alias.property())));
        assert!(!Fingerprint::converse(p.snak("s")).matches(&Value::from(Item::new("x"))));
    }

    #[test]
    fn value_matching_coerces_subtypes() {
        let string = Fingerprint::from(Str::new("y"));
        assert!(string.matches(&Value::from(ExternalId::new("y"))));
        assert!(!string.matches(&Value::from(ExternalId::new("z"))));
        let id = Fingerprint::from(ExternalId::new("y"));
        assert!(!id.matches(&Value::from(Str::new("y"))));
    }

    #[test]
    fn property_ranges_are_wildcards_when_unset() {
        let bare = Fingerprint::from(Property::new("p"));
        let ranged = Property::with_range("p", Datatype::Item);
        assert!(bare.matches(&Value::from(ranged.clone())));
        assert!(Fingerprint::from(ranged.clone()).matches(&Value::from(Property::new("p"))));
        assert!(
            !Fingerprint::from(ranged).matches(&Value::from(Property::with_range(
                "p",
                Datatype::Text
            )))
        );
        assert!(!bare.matches(&Value::from(Property::new("q"))));
    }

    #[test]
    fn deep_values_use_wildcards() {
        let one = Decimal::from(1);
        let pattern = Fingerprint::from(Quantity::new(one));
        assert!(pattern.matches(&Value::from(Quantity::new(one).with_unit(Item::new("kg")))));
        assert!(!pattern.matches(&Value::from(Quantity::new(Decimal::from(2)))));
    }

    #[test]
    fn compound_matching() {
        let fp = item("x") | item("y");
        assert!(fp.matches(&Value::from(Item::new("y"))));
        assert!(!fp.matches(&Value::from(Item::new("z"))));
        assert!(!(item("x") & item("y")).matches(&Value::from(Item::new("x"))));
        assert!(Fingerprint::Full.matches(&Value::from("s")));
        assert!(!Fingerprint::Empty.matches(&Value::from("s")));
    }

    #[test]
    fn serde_shape() {
        let fp = item("x") | Fingerprint::Full;
        let json = serde_json::to_value(&fp).expect("serialize");
        assert_eq!(json, serde_json::json!({"or": [{"value": {"item": "x"}}, "full"]}));
        let back: Fingerprint = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, fp);
    }
}
