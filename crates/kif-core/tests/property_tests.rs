//! # Property-Based Tests
//!
//! Algebraic laws of fingerprint and filter normalization, checked with proptest.

use kif_core::{
    Annotations, Datatype, DatatypeMask, Decimal, Entity, ExternalId, Filter, Fingerprint, Item,
    Property, Quantity, Rank, RankMask, Snak, SnakMask, Statement, Str, Text, Time, TimePrecision,
    Value,
};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn item() -> impl Strategy<Value = Item> {
    prop_oneof![Just(Item::new("a")), Just(Item::new("b"))]
}

fn property() -> impl Strategy<Value = Property> {
    prop_oneof![Just(Property::new("p")), Just(Property::new("q"))]
}

fn quantity() -> impl Strategy<Value = Quantity> {
    (0i64..3, prop::option::of(item())).prop_map(|(amount, unit)| {
        let quantity = Quantity::new(Decimal::from(amount));
        match unit {
            Some(unit) => quantity.with_unit(unit),
            None => quantity,
        }
    })
}

fn time() -> impl Strategy<Value = Time> {
    (
        prop_oneof![Just("2024-07-11"), Just("2024-07-12")],
        prop::option::of(Just(TimePrecision::Day)),
    )
        .prop_map(|(literal, precision)| {
            let time = Time::parse(literal).expect("time literal");
            match precision {
                Some(precision) => time.with_precision(precision),
                None => time,
            }
        })
}

/// Values whose normalization never coerces between datatypes.
fn plain_value() -> impl Strategy<Value = Value> + Clone {
    prop_oneof![
        item().prop_map(Value::from),
        property().prop_map(Value::from),
        prop_oneof![Just(Text::new("t")), Just(Text::with_language("t", "pt"))]
            .prop_map(Value::from),
        quantity().prop_map(Value::from),
        time().prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> + Clone {
    prop_oneof![
        3 => plain_value(),
        1 => prop_oneof![Just("a"), Just("b")].prop_map(|s| Value::from(Str::new(s))),
        1 => prop_oneof![Just("a"), Just("b")].prop_map(|s| Value::from(ExternalId::new(s))),
    ]
}

fn fingerprint_over(
    values: impl Strategy<Value = Value> + Clone + 'static,
) -> BoxedStrategy<Fingerprint> {
    let leaf = prop_oneof![
        Just(Fingerprint::Full),
        Just(Fingerprint::Empty),
        values.clone().prop_map(Fingerprint::from),
        (property(), item()).prop_map(|(p, v)| Fingerprint::from(p.snak(v))),
        property().prop_map(|p| Fingerprint::from(p.some_value())),
        (property(), values).prop_map(|(p, v)| Fingerprint::converse(p.snak(v))),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(Fingerprint::And),
            vec(inner, 0..4).prop_map(Fingerprint::Or),
        ]
    })
    .boxed()
}

fn fingerprint() -> BoxedStrategy<Fingerprint> {
    fingerprint_over(value())
}

fn datatype_mask() -> impl Strategy<Value = DatatypeMask> {
    (0u32..=DatatypeMask::ALL.bits())
        .prop_map(|bits| DatatypeMask::try_from(bits).expect("in range"))
}

/// Filters whose languages agree or are unset, so conjunction is associative.
fn filter() -> impl Strategy<Value = Filter> {
    let subject = prop_oneof![
        Just(Fingerprint::Full),
        item().prop_map(Fingerprint::from),
        (item(), item()).prop_map(|(a, b)| Fingerprint::from(a) | Fingerprint::from(b)),
        property().prop_map(|p| Fingerprint::from(p.some_value())),
    ];
    let property = prop_oneof![
        Just(Fingerprint::Full),
        property().prop_map(Fingerprint::from),
        Just(Fingerprint::from(Property::with_range("p", Datatype::Item))),
    ];
    let value = prop_oneof![Just(Fingerprint::Full), fingerprint_over(plain_value())];
    (
        (subject, property, value),
        (
            0u32..=SnakMask::ALL.bits(),
            datatype_mask(),
            datatype_mask(),
            0u32..=RankMask::ALL.bits(),
        ),
        (prop::option::of(Just("en")), any::<bool>()),
    )
        .prop_map(
            |(
                (subject, property, value),
                (snak, subject_mask, value_mask, rank),
                (language, annotated),
            )| {
                let filter = Filter::new()
                    .with_subject(subject)
                    .with_property(property)
                    .with_value(value)
                    .with_snak_mask(snak)
                    .expect("snak mask")
                    .with_subject_mask(subject_mask)
                    .expect("subject mask")
                    .with_value_mask(value_mask)
                    .expect("value mask")
                    .with_rank_mask(rank)
                    .expect("rank mask")
                    .with_annotated(annotated);
                match language {
                    Some(language) => filter.with_language(language),
                    None => filter,
                }
            },
        )
}

fn statement() -> impl Strategy<Value = Statement> {
    let subject = prop_oneof![
        item().prop_map(Entity::from),
        property().prop_map(Entity::from),
    ];
    let snak = (property(), value(), 0u8..3).prop_map(|(p, v, kind)| match kind {
        0 => p.snak(v),
        1 => p.some_value(),
        _ => p.no_value(),
    });
    let annotations = prop::option::of(prop_oneof![
        Just(Rank::Preferred),
        Just(Rank::Normal),
        Just(Rank::Deprecated),
    ]);
    (subject, snak, annotations).prop_map(|(subject, snak, rank)| {
        let statement = Statement::new(subject, snak);
        match rank {
            Some(rank) => statement.annotated(Annotations::with_rank(rank)),
            None => statement,
        }
    })
}

// =============================================================================
// FINGERPRINT LAWS
// =============================================================================

proptest! {
    /// Normalizing twice against the same mask changes nothing.
    #[test]
    fn fingerprint_normalize_idempotent(fp in fingerprint(), mask in datatype_mask()) {
        let once = fp.normalize(mask);
        prop_assert_eq!(once.normalize(mask), once);
    }

    /// Full and Empty are neutral or absorbing as expected.
    #[test]
    fn fingerprint_absorption(fp in fingerprint(), mask in datatype_mask()) {
        let normal = fp.normalize(mask);
        prop_assert_eq!((fp.clone() & Fingerprint::Full).normalize(mask), normal.clone());
        prop_assert_eq!((fp.clone() | Fingerprint::Empty).normalize(mask), normal);
        prop_assert_eq!((fp.clone() & Fingerprint::Empty).normalize(mask), Fingerprint::Empty);
        prop_assert_eq!((fp | Fingerprint::Full).normalize(DatatypeMask::ALL), Fingerprint::Full);
    }

    /// Two distinct exact values contradict each other.
    #[test]
    fn fingerprint_contradiction(a in value(), b in value()) {
        prop_assume!(a != b);
        let fp = Fingerprint::from(a) & Fingerprint::from(b);
        prop_assert_eq!(fp.normalize(DatatypeMask::ALL), Fingerprint::Empty);
    }

    /// A matched value always lies within the fingerprint's datatype mask.
    #[test]
    fn fingerprint_mask_soundness(fp in fingerprint(), v in value()) {
        if fp.matches(&v) {
            prop_assert!(fp.datatype_mask().overlaps(DatatypeMask::from(v.datatype())));
        }
    }

    /// Normalized trees are flat: no compound has a same-kind child.
    #[test]
    fn fingerprint_normal_form_is_flat(fp in fingerprint(), mask in datatype_mask()) {
        fn check(fp: &Fingerprint) -> bool {
            match fp {
                Fingerprint::And(children) => {
                    children.len() >= 2
                        && children.iter().all(|c| {
                            !matches!(c, Fingerprint::And(_) | Fingerprint::Full | Fingerprint::Empty)
                                && check(c)
                        })
                }
                Fingerprint::Or(children) => {
                    children.len() >= 2
                        && children.iter().all(|c| {
                            !matches!(c, Fingerprint::Or(_) | Fingerprint::Full | Fingerprint::Empty)
                                && check(c)
                        })
                }
                _ => true,
            }
        }
        prop_assert!(check(&fp.normalize(mask)));
    }
}

// =============================================================================
// FILTER LAWS
// =============================================================================

proptest! {
    /// Filter normalization is idempotent.
    #[test]
    fn filter_normalize_idempotent(f in filter()) {
        let once = f.normalize();
        prop_assert_eq!(once.normalize(), once);
    }

    /// Every statement matches the filter built from it.
    #[test]
    fn filter_from_statement_matches(s in statement()) {
        prop_assert!(Filter::from_statement(&s).matches(&s));
    }

    /// Combination is commutative up to normalization.
    #[test]
    fn combine_commutative(a in filter(), b in filter(), pool in vec(statement(), 1..8)) {
        let ab = a.combine([&b]);
        let ba = b.combine([&a]);
        prop_assert_eq!(ab.is_empty(), ba.is_empty());
        for s in &pool {
            prop_assert_eq!(ab.matches(s), ba.matches(s));
        }
    }

    /// One combination does not depend on the order of its operands.
    #[test]
    fn combine_operand_order_irrelevant(
        a in filter(),
        b in filter(),
        c in filter(),
        pool in vec(statement(), 1..8),
    ) {
        let abc = a.combine([&b, &c]);
        let cba = c.combine([&b, &a]);
        let bca = b.combine([&c, &a]);
        prop_assert_eq!(abc.is_empty(), cba.is_empty());
        prop_assert_eq!(abc.is_empty(), bca.is_empty());
        for s in &pool {
            prop_assert_eq!(abc.matches(s), cba.matches(s));
            prop_assert_eq!(abc.matches(s), bca.matches(s));
        }
    }

    /// Combining is normalizing the field-wise conjunction.
    #[test]
    fn combine_is_normalized_conjunction(a in filter(), b in filter()) {
        let conjunction = Filter::new()
            .with_subject(a.subject().clone() & b.subject().clone())
            .with_property(a.property().clone() & b.property().clone())
            .with_value(a.value().clone() & b.value().clone())
            .with_snak_mask(a.snak_mask() & b.snak_mask())
            .expect("snak mask")
            .with_subject_mask(a.subject_mask() & b.subject_mask())
            .expect("subject mask")
            .with_property_mask(a.property_mask() & b.property_mask())
            .expect("property mask")
            .with_value_mask(a.value_mask() & b.value_mask())
            .expect("value mask")
            .with_rank_mask(a.rank_mask() & b.rank_mask())
            .expect("rank mask")
            .with_annotated(a.annotated() || b.annotated());
        let conjunction = match a.language().or(b.language()) {
            Some(language) => conjunction.with_language(language),
            None => conjunction,
        };
        prop_assert_eq!(a.combine([&b]), conjunction.normalize());
    }

    /// Distinct pinned values leave only the valueless snaks.
    #[test]
    fn combine_contradicting_values(a in plain_value(), b in plain_value(), s in statement()) {
        prop_assume!(a != b);
        let left = Filter::new().with_value(a);
        let right = Filter::new().with_value(b);
        let combined = left.combine([&right]);
        prop_assert!(!combined.is_empty());
        prop_assert_eq!(combined.matches(&s), !matches!(s.snak, Snak::Value { .. }));
    }

    /// An empty filter matches nothing.
    #[test]
    fn empty_filters_match_nothing(f in filter(), s in statement()) {
        if f.is_empty() {
            prop_assert!(!f.matches(&s));
        }
    }
}
