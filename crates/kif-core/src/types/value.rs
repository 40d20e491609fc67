//! Values, datatypes and value classes.

use super::{ArgSite, Decimal, KifError, PseudoProperty, Snak, Time};
use crate::primitives::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// IRI
// =============================================================================

/// An IRI. Opaque: no resolution, no normalization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(pub String);

impl Iri {
    /// Create a new IRI from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

// =============================================================================
// ENTITIES
// =============================================================================

/// An item entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(pub Iri);

impl Item {
    /// Create a new item.
    #[must_use]
    pub fn new(iri: impl Into<String>) -> Self {
        Self(Iri::new(iri))
    }
}

/// A lexeme entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexeme(pub Iri);

impl Lexeme {
    /// Create a new lexeme.
    #[must_use]
    pub fn new(iri: impl Into<String>) -> Self {
        Self(Iri::new(iri))
    }
}

/// A property entity, optionally declaring the datatype of its values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub iri: Iri,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Datatype>,
}

impl Property {
    /// Create a property with no declared range.
    #[must_use]
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: Iri::new(iri),
            range: None,
        }
    }

    /// Create a property with a declared range.
    #[must_use]
    pub fn with_range(iri: impl Into<String>, range: Datatype) -> Self {
        Self {
            iri: Iri::new(iri),
            range: Some(range),
        }
    }

    /// The pseudo-property this property stands for, if any.
    #[must_use]
    pub fn pseudo(&self) -> Option<PseudoProperty> {
        PseudoProperty::from_iri(self.iri.as_str())
    }

    /// Build the value snak `(self, value)`.
    #[must_use]
    pub fn snak(&self, value: impl Into<Value>) -> Snak {
        Snak::Value {
            property: self.clone(),
            value: value.into(),
        }
    }

    /// Build the some-value snak for this property.
    #[must_use]
    pub fn some_value(&self) -> Snak {
        Snak::SomeValue {
            property: self.clone(),
        }
    }

    /// Build the no-value snak for this property.
    #[must_use]
    pub fn no_value(&self) -> Snak {
        Snak::NoValue {
            property: self.clone(),
        }
    }
}

/// Any of the three entity kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Item(Item),
    Property(Property),
    Lexeme(Lexeme),
}

impl Entity {
    /// The entity's IRI.
    #[must_use]
    pub fn iri(&self) -> &Iri {
        match self {
            Self::Item(item) => &item.0,
            Self::Property(property) => &property.iri,
            Self::Lexeme(lexeme) => &lexeme.0,
        }
    }
}

// =============================================================================
// DATA VALUES
// =============================================================================

/// A monolingual text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    pub language: String,
}

impl Text {
    /// Create a text in the default language.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_language(content, DEFAULT_LANGUAGE)
    }

    /// Create a text in the given language.
    #[must_use]
    pub fn with_language(content: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            language: language.into(),
        }
    }
}

/// A plain string (the String datatype).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Str(pub String);

impl Str {
    /// Create a new string value.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

/// An external identifier; a specialization of String.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(pub String);

impl ExternalId {
    /// Create a new external identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

/// A quantity with optional unit and error bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Decimal>,
}

impl Quantity {
    /// Create a unitless quantity without bounds.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self {
            amount,
            unit: None,
            lower_bound: None,
            upper_bound: None,
        }
    }

    /// Set the unit.
    #[must_use]
    pub fn with_unit(mut self, unit: Item) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Set the lower and upper bounds.
    #[must_use]
    pub fn with_bounds(mut self, lower: Decimal, upper: Decimal) -> Self {
        self.lower_bound = Some(lower);
        self.upper_bound = Some(upper);
        self
    }

    /// Check whether `other` satisfies `self` taken as a pattern.
    ///
    /// Amounts must be equal; unset unit and bounds in `self` are wildcards.
    #[must_use]
    pub fn matches(&self, other: &Quantity) -> bool {
        self.amount == other.amount
            && self
                .unit
                .as_ref()
                .is_none_or(|unit| other.unit.as_ref() == Some(unit))
            && self
                .lower_bound
                .is_none_or(|lb| other.lower_bound == Some(lb))
            && self
                .upper_bound
                .is_none_or(|ub| other.upper_bound == Some(ub))
    }
}

// =============================================================================
// DATATYPES & VALUE CLASSES
// =============================================================================

/// The concrete kind of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Datatype {
    Item,
    Property,
    Lexeme,
    Iri,
    Text,
    String,
    ExternalId,
    Quantity,
    Time,
}

impl Datatype {
    /// All datatypes, in mask-bit order.
    pub const ALL: [Datatype; 9] = [
        Self::Item,
        Self::Property,
        Self::Lexeme,
        Self::Iri,
        Self::Text,
        Self::String,
        Self::ExternalId,
        Self::Quantity,
        Self::Time,
    ];

    /// Get the datatype name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::Property => "Property",
            Self::Lexeme => "Lexeme",
            Self::Iri => "IRI",
            Self::Text => "Text",
            Self::String => "String",
            Self::ExternalId => "ExternalId",
            Self::Quantity => "Quantity",
            Self::Time => "Time",
        }
    }

    /// Items, properties and lexemes.
    #[must_use]
    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Item | Self::Property | Self::Lexeme)
    }

    /// Data values compared by plain equality.
    #[must_use]
    pub fn is_shallow_data_value(&self) -> bool {
        matches!(
            self,
            Self::Iri | Self::Text | Self::String | Self::ExternalId
        )
    }

    /// Data values with wildcard-able fields.
    #[must_use]
    pub fn is_deep_data_value(&self) -> bool {
        matches!(self, Self::Quantity | Self::Time)
    }

    /// Reflexive subtyping. ExternalId is the only proper subtype (of String).
    #[must_use]
    pub fn is_subtype_of(self, other: Datatype) -> bool {
        self == other || (self == Self::ExternalId && other == Self::String)
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A class of values: one concrete datatype or an abstract umbrella.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueClass {
    Value,
    Entity,
    DataValue,
    ShallowDataValue,
    DeepDataValue,
    Concrete(Datatype),
}

impl ValueClass {
    /// Get the class name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Value => "Value",
            Self::Entity => "Entity",
            Self::DataValue => "DataValue",
            Self::ShallowDataValue => "ShallowDataValue",
            Self::DeepDataValue => "DeepDataValue",
            Self::Concrete(datatype) => datatype.name(),
        }
    }

    /// Check whether values of `datatype` are instances of this class.
    #[must_use]
    pub fn admits(&self, datatype: Datatype) -> bool {
        match self {
            Self::Value => true,
            Self::Entity => datatype.is_entity(),
            Self::DataValue => !datatype.is_entity(),
            Self::ShallowDataValue => datatype.is_shallow_data_value(),
            Self::DeepDataValue => datatype.is_deep_data_value(),
            Self::Concrete(concrete) => datatype.is_subtype_of(*concrete),
        }
    }
}

impl From<Datatype> for ValueClass {
    fn from(datatype: Datatype) -> Self {
        Self::Concrete(datatype)
    }
}

// =============================================================================
// VALUE
// =============================================================================

/// Any value that can occupy the subject, property or value of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Item(Item),
    Property(Property),
    Lexeme(Lexeme),
    Iri(Iri),
    Text(Text),
    String(Str),
    ExternalId(ExternalId),
    Quantity(Quantity),
    Time(Time),
}

impl Value {
    /// The concrete kind of this value.
    #[must_use]
    pub fn datatype(&self) -> Datatype {
        match self {
            Self::Item(_) => Datatype::Item,
            Self::Property(_) => Datatype::Property,
            Self::Lexeme(_) => Datatype::Lexeme,
            Self::Iri(_) => Datatype::Iri,
            Self::Text(_) => Datatype::Text,
            Self::String(_) => Datatype::String,
            Self::ExternalId(_) => Datatype::ExternalId,
            Self::Quantity(_) => Datatype::Quantity,
            Self::Time(_) => Datatype::Time,
        }
    }

    /// Check if this value is an entity.
    #[must_use]
    pub fn is_entity(&self) -> bool {
        self.datatype().is_entity()
    }

    /// Check if this value is one of the pseudo-properties.
    #[must_use]
    pub fn is_pseudo_property(&self) -> bool {
        matches!(self, Self::Property(property) if property.pseudo().is_some())
    }

    /// Coerce this value into `class`.
    ///
    /// Instances of the class are returned unchanged, except that an external
    /// identifier coerced into String becomes a plain string. Other values go
    /// through the conversions of the class's datatypes, in mask-bit order;
    /// the first conversion that accepts the value wins.
    pub fn coerce_into(&self, class: ValueClass) -> Result<Value, KifError> {
        if class.admits(self.datatype()) {
            return Ok(match (self, class) {
                (Self::ExternalId(id), ValueClass::Concrete(Datatype::String)) => {
                    Self::String(Str(id.0.clone()))
                }
                _ => self.clone(),
            });
        }
        Datatype::ALL
            .iter()
            .filter(|target| class.admits(**target))
            .find_map(|target| self.convert_to(*target))
            .ok_or_else(|| {
                KifError::coercion(
                    self,
                    class.name(),
                    ArgSite::new("Value::coerce_into", "value", 1),
                )
            })
    }

    fn convert_to(&self, target: Datatype) -> Option<Value> {
        let lexical = self.lexical_form()?;
        let source = self.datatype();
        conversions(target)
            .iter()
            .find(|(accepts, _)| accepts(source))
            .map(|(_, convert)| convert(lexical))
    }

    /// The string content of IRIs, strings and external identifiers.
    fn lexical_form(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri.as_str()),
            Self::String(s) => Some(&s.0),
            Self::ExternalId(id) => Some(&id.0),
            _ => None,
        }
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

/// A source test paired with the converter it guards.
type Conversion = (fn(Datatype) -> bool, fn(&str) -> Value);

fn from_iri(source: Datatype) -> bool {
    source == Datatype::Iri
}

fn from_string(source: Datatype) -> bool {
    source.is_subtype_of(Datatype::String)
}

fn from_plain_string(source: Datatype) -> bool {
    source == Datatype::String
}

fn to_item(s: &str) -> Value {
    Value::Item(Item::new(s))
}

fn to_property(s: &str) -> Value {
    Value::Property(Property::new(s))
}

fn to_lexeme(s: &str) -> Value {
    Value::Lexeme(Lexeme::new(s))
}

fn to_iri(s: &str) -> Value {
    Value::Iri(Iri::new(s))
}

fn to_text(s: &str) -> Value {
    Value::Text(Text::new(s))
}

fn to_external_id(s: &str) -> Value {
    Value::ExternalId(ExternalId::new(s))
}

static ITEM_CONVERSIONS: [Conversion; 2] = [(from_iri, to_item), (from_string, to_item)];
static PROPERTY_CONVERSIONS: [Conversion; 2] =
    [(from_iri, to_property), (from_string, to_property)];
static LEXEME_CONVERSIONS: [Conversion; 2] =
    [(from_iri, to_lexeme), (from_string, to_lexeme)];
static IRI_CONVERSIONS: [Conversion; 1] = [(from_string, to_iri)];
static TEXT_CONVERSIONS: [Conversion; 1] = [(from_string, to_text)];
static EXTERNAL_ID_CONVERSIONS: [Conversion; 1] = [(from_plain_string, to_external_id)];

/// Conversions into `target`, most specific source first.
fn conversions(target: Datatype) -> &'static [Conversion] {
    match target {
        Datatype::Item => &ITEM_CONVERSIONS,
        Datatype::Property => &PROPERTY_CONVERSIONS,
        Datatype::Lexeme => &LEXEME_CONVERSIONS,
        Datatype::Iri => &IRI_CONVERSIONS,
        Datatype::Text => &TEXT_CONVERSIONS,
        Datatype::ExternalId => &EXTERNAL_ID_CONVERSIONS,
        Datatype::String | Datatype::Quantity | Datatype::Time => &[],
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        Self::Item(item)
    }
}

impl From<Property> for Value {
    fn from(property: Property) -> Self {
        Self::Property(property)
    }
}

impl From<Lexeme> for Value {
    fn from(lexeme: Lexeme) -> Self {
        Self::Lexeme(lexeme)
    }
}

impl From<Iri> for Value {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<Text> for Value {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl From<Str> for Value {
    fn from(s: Str) -> Self {
        Self::String(s)
    }
}

impl From<ExternalId> for Value {
    fn from(id: ExternalId) -> Self {
        Self::ExternalId(id)
    }
}

impl From<Quantity> for Value {
    fn from(quantity: Quantity) -> Self {
        Self::Quantity(quantity)
    }
}

impl From<Time> for Value {
    fn from(time: Time) -> Self {
        Self::Time(time)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Str::new(s))
    }
}

impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::Item(item) => Self::Item(item),
            Entity::Property(property) => Self::Property(property),
            Entity::Lexeme(lexeme) => Self::Lexeme(lexeme),
        }
    }
}

impl From<Item> for Entity {
    fn from(item: Item) -> Self {
        Self::Item(item)
    }
}

impl From<Property> for Entity {
    fn from(property: Property) -> Self {
        Self::Property(property)
    }
}

impl From<Lexeme> for Entity {
    fn from(lexeme: Lexeme) -> Self {
        Self::Lexeme(lexeme)
    }
}

impl TryFrom<Value> for Entity {
    type Error = KifError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Item(item) => Ok(Self::Item(item)),
            Value::Property(property) => Ok(Self::Property(property)),
            Value::Lexeme(lexeme) => Ok(Self::Lexeme(lexeme)),
            other => Err(KifError::coercion(
                other,
                "Entity",
                ArgSite::new("Entity::try_from", "value", 1),
            )),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
