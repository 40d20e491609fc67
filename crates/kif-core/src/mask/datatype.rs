//! Masks over the nine value datatypes.

use crate::{ArgSite, Datatype, KifError, Value, ValueClass};
use std::collections::BTreeMap;
use std::sync::LazyLock;

flag_mask! {
    /// A set of value datatypes.
    ///
    /// Overlap with a STRING mask is asymmetric: see [`DatatypeMask::overlaps`].
    DatatypeMask {
        ITEM = 1 << 0,
        PROPERTY = 1 << 1,
        LEXEME = 1 << 2,
        IRI = 1 << 3,
        TEXT = 1 << 4,
        STRING = 1 << 5,
        EXTERNAL_ID = 1 << 6,
        QUANTITY = 1 << 7,
        TIME = 1 << 8,
    }
}

/// Canonical masks that name a value class. Everything else has no class.
static VALUE_CLASSES: LazyLock<BTreeMap<DatatypeMask, ValueClass>> = LazyLock::new(|| {
    let mut classes: BTreeMap<DatatypeMask, ValueClass> = Datatype::ALL
        .iter()
        .map(|datatype| (DatatypeMask::from(*datatype), ValueClass::Concrete(*datatype)))
        .collect();
    classes.extend([
        (DatatypeMask::VALUE, ValueClass::Value),
        (DatatypeMask::ENTITY, ValueClass::Entity),
        (DatatypeMask::DATA_VALUE, ValueClass::DataValue),
        (DatatypeMask::SHALLOW_DATA_VALUE, ValueClass::ShallowDataValue),
        // deep data values coerce through the shallow class
        (DatatypeMask::DEEP_DATA_VALUE, ValueClass::ShallowDataValue),
    ]);
    classes
});

/// Anything [`DatatypeMask::check`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatatypeMaskArg {
    /// An existing mask.
    Mask(DatatypeMask),
    /// Raw flag bits.
    Bits(u32),
    /// A concrete or umbrella value class.
    Class(ValueClass),
}

impl From<DatatypeMask> for DatatypeMaskArg {
    fn from(mask: DatatypeMask) -> Self {
        Self::Mask(mask)
    }
}

impl From<u32> for DatatypeMaskArg {
    fn from(bits: u32) -> Self {
        Self::Bits(bits)
    }
}

impl From<ValueClass> for DatatypeMaskArg {
    fn from(class: ValueClass) -> Self {
        Self::Class(class)
    }
}

impl From<Datatype> for DatatypeMaskArg {
    fn from(datatype: Datatype) -> Self {
        Self::Class(ValueClass::Concrete(datatype))
    }
}

impl From<&Value> for DatatypeMaskArg {
    fn from(value: &Value) -> Self {
        Self::from(value.datatype())
    }
}

impl From<Datatype> for DatatypeMask {
    fn from(datatype: Datatype) -> Self {
        match datatype {
            Datatype::Item => Self::ITEM,
            Datatype::Property => Self::PROPERTY,
            Datatype::Lexeme => Self::LEXEME,
            Datatype::Iri => Self::IRI,
            Datatype::Text => Self::TEXT,
            Datatype::String => Self::STRING,
            Datatype::ExternalId => Self::EXTERNAL_ID,
            Datatype::Quantity => Self::QUANTITY,
            Datatype::Time => Self::TIME,
        }
    }
}

impl DatatypeMask {
    /// Every datatype.
    pub const VALUE: Self = Self::ALL;

    /// Items, properties and lexemes.
    pub const ENTITY: Self = Self(Self::ITEM.0 | Self::PROPERTY.0 | Self::LEXEME.0);

    /// Every non-entity datatype.
    pub const DATA_VALUE: Self = Self(Self::VALUE.0 & !Self::ENTITY.0);

    /// Data values compared by plain equality.
    pub const SHALLOW_DATA_VALUE: Self =
        Self(Self::IRI.0 | Self::TEXT.0 | Self::STRING.0 | Self::EXTERNAL_ID.0);

    /// Data values with wildcard-able fields.
    pub const DEEP_DATA_VALUE: Self = Self(Self::DATA_VALUE.0 & !Self::SHALLOW_DATA_VALUE.0);

    /// Coerce `arg` into a mask.
    pub fn check(arg: impl Into<DatatypeMaskArg>) -> Result<Self, KifError> {
        Self::check_at(arg, ArgSite::new("DatatypeMask::check", "arg", 1))
    }

    /// Coerce `arg` into a mask, reporting failures at `site`.
    pub fn check_at(arg: impl Into<DatatypeMaskArg>, site: ArgSite) -> Result<Self, KifError> {
        match arg.into() {
            DatatypeMaskArg::Mask(mask) => Ok(mask),
            DatatypeMaskArg::Bits(bits) => Self::check_bits(bits, site),
            DatatypeMaskArg::Class(class) => Ok(Self::of_class(class)),
        }
    }

    /// The mask of a value class.
    #[must_use]
    pub fn of_class(class: ValueClass) -> Self {
        match class {
            ValueClass::Value => Self::VALUE,
            ValueClass::Entity => Self::ENTITY,
            ValueClass::DataValue => Self::DATA_VALUE,
            ValueClass::ShallowDataValue => Self::SHALLOW_DATA_VALUE,
            ValueClass::DeepDataValue => Self::DEEP_DATA_VALUE,
            ValueClass::Concrete(datatype) => Self::from(datatype),
        }
    }

    /// Check whether `arg` overlaps this mask.
    pub fn matches(self, arg: impl Into<DatatypeMaskArg>) -> Result<bool, KifError> {
        Ok(self.overlaps(Self::check_at(
            arg,
            ArgSite::new("DatatypeMask::matches", "arg", 1),
        )?))
    }

    /// Flag overlap, plus: a STRING mask overlaps EXTERNAL_ID (never the reverse).
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.intersects(other)
            || (self.contains(Self::STRING) && other.contains(Self::EXTERNAL_ID))
    }

    /// The value class this mask names, if it is one of the canonical masks.
    #[must_use]
    pub fn to_value_class(self) -> Option<ValueClass> {
        VALUE_CLASSES.get(&self).copied()
    }
}
