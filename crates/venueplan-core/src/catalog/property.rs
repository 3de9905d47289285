//! Typed property schema for catalog elements.
//!
//! Every editable property of an element declares one schema variant; placed
//! items carry matching [`PropertyValue`]s keyed by property name.

use crate::color::SerializableColor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Property values of a single placed item, keyed by property name.
pub type PropertyValues = BTreeMap<String, PropertyValue>;

/// Unit attached to a length measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Mm,
    #[default]
    Cm,
    M,
    In,
    Ft,
}

impl LengthUnit {
    /// Centimeters per one of this unit.
    pub fn to_cm(self) -> f64 {
        match self {
            LengthUnit::Mm => 0.1,
            LengthUnit::Cm => 1.0,
            LengthUnit::M => 100.0,
            LengthUnit::In => 2.54,
            LengthUnit::Ft => 30.48,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
            LengthUnit::In => "in",
            LengthUnit::Ft => "ft",
        }
    }
}

/// A length with its unit, e.g. `{ "length": 120, "unit": "cm" }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthMeasure {
    pub length: f64,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl LengthMeasure {
    pub fn new(length: f64, unit: LengthUnit) -> Self {
        Self { length, unit }
    }

    pub fn cm(length: f64) -> Self {
        Self::new(length, LengthUnit::Cm)
    }

    /// The length converted to centimeters (one centimeter = one canvas unit).
    pub fn in_cm(&self) -> f64 {
        self.length * self.unit.to_cm()
    }
}

/// One selectable value of an enum property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    pub value: String,
    pub label: String,
}

/// Discriminant of a property schema / value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Number,
    Color,
    Enum,
    LengthMeasure,
}

/// Schema of one editable property, with the typed default for its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PropertySchema {
    Number {
        default: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Color {
        default: SerializableColor,
    },
    Enum {
        default: String,
        values: Vec<EnumOption>,
    },
    LengthMeasure {
        default: LengthMeasure,
    },
}

impl PropertySchema {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertySchema::Number { .. } => PropertyKind::Number,
            PropertySchema::Color { .. } => PropertyKind::Color,
            PropertySchema::Enum { .. } => PropertyKind::Enum,
            PropertySchema::LengthMeasure { .. } => PropertyKind::LengthMeasure,
        }
    }

    /// The value a freshly placed item starts with.
    pub fn default_value(&self) -> PropertyValue {
        match self {
            PropertySchema::Number { default, .. } => PropertyValue::Number(*default),
            PropertySchema::Color { default } => PropertyValue::Color(*default),
            PropertySchema::Enum { default, .. } => PropertyValue::Enum(default.clone()),
            PropertySchema::LengthMeasure { default } => PropertyValue::LengthMeasure(*default),
        }
    }

    /// Bring `value` in line with this schema.
    ///
    /// Numbers are clamped into `min..=max`; values of the wrong kind, unknown
    /// enum values and non-finite or negative lengths yield `None`.
    pub fn conform(&self, value: PropertyValue) -> Option<PropertyValue> {
        match (self, value) {
            (PropertySchema::Number { min, max, .. }, PropertyValue::Number(n)) => {
                if !n.is_finite() {
                    return None;
                }
                let mut n = n;
                if let Some(min) = min {
                    n = n.max(*min);
                }
                if let Some(max) = max {
                    n = n.min(*max);
                }
                Some(PropertyValue::Number(n))
            }
            (PropertySchema::Color { .. }, value @ PropertyValue::Color(_)) => Some(value),
            (PropertySchema::Enum { values, .. }, PropertyValue::Enum(v)) => values
                .iter()
                .any(|option| option.value == v)
                .then_some(PropertyValue::Enum(v)),
            (PropertySchema::LengthMeasure { .. }, PropertyValue::LengthMeasure(m)) => {
                (m.length.is_finite() && m.length >= 0.0).then_some(PropertyValue::LengthMeasure(m))
            }
            _ => None,
        }
    }
}

/// A named, labelled property of a catalog element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub schema: PropertySchema,
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, schema: PropertySchema) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            schema,
        }
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>, default: f64) -> Self {
        Self::new(
            name,
            label,
            PropertySchema::Number {
                default,
                min: None,
                max: None,
            },
        )
    }

    pub fn color(
        name: impl Into<String>,
        label: impl Into<String>,
        default: SerializableColor,
    ) -> Self {
        Self::new(name, label, PropertySchema::Color { default })
    }

    pub fn enumeration(
        name: impl Into<String>,
        label: impl Into<String>,
        default: &str,
        values: &[(&str, &str)],
    ) -> Self {
        let values = values
            .iter()
            .map(|(value, label)| EnumOption {
                value: (*value).to_string(),
                label: (*label).to_string(),
            })
            .collect();
        Self::new(
            name,
            label,
            PropertySchema::Enum {
                default: default.to_string(),
                values,
            },
        )
    }

    /// A length property with a default given in centimeters.
    pub fn length(name: impl Into<String>, label: impl Into<String>, default_cm: f64) -> Self {
        Self::new(
            name,
            label,
            PropertySchema::LengthMeasure {
                default: LengthMeasure::cm(default_cm),
            },
        )
    }

    /// Restrict a number property to `min..=max`. No effect on other kinds.
    pub fn with_range(mut self, lower: f64, upper: f64) -> Self {
        if let PropertySchema::Number { min, max, .. } = &mut self.schema {
            *min = Some(lower);
            *max = Some(upper);
        }
        self
    }

    pub fn kind(&self) -> PropertyKind {
        self.schema.kind()
    }
}

/// Value of one property on a placed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum PropertyValue {
    Number(f64),
    Color(SerializableColor),
    Enum(String),
    LengthMeasure(LengthMeasure),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Number(_) => PropertyKind::Number,
            PropertyValue::Color(_) => PropertyKind::Color,
            PropertyValue::Enum(_) => PropertyKind::Enum,
            PropertyValue::LengthMeasure(_) => PropertyKind::LengthMeasure,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<SerializableColor> {
        match self {
            PropertyValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            PropertyValue::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_length(&self) -> Option<LengthMeasure> {
        match self {
            PropertyValue::LengthMeasure(m) => Some(*m),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::Color(c) => write!(f, "{c}"),
            PropertyValue::Enum(v) => f.write_str(v),
            PropertyValue::LengthMeasure(m) => write!(f, "{}{}", m.length, m.unit.symbol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_schema() {
        let seats = PropertyDefinition::number("seats", "Seats", 8.0).with_range(4.0, 12.0);
        assert_eq!(seats.schema.default_value(), PropertyValue::Number(8.0));
        assert_eq!(seats.kind(), PropertyKind::Number);

        let width = PropertyDefinition::length("width", "Width", 120.0);
        assert_eq!(
            width.schema.default_value(),
            PropertyValue::LengthMeasure(LengthMeasure::cm(120.0))
        );
    }

    #[test]
    fn test_number_is_clamped() {
        let seats = PropertyDefinition::number("seats", "Seats", 8.0).with_range(4.0, 12.0);
        assert_eq!(
            seats.schema.conform(PropertyValue::Number(20.0)),
            Some(PropertyValue::Number(12.0))
        );
        assert_eq!(
            seats.schema.conform(PropertyValue::Number(1.0)),
            Some(PropertyValue::Number(4.0))
        );
        assert_eq!(seats.schema.conform(PropertyValue::Number(f64::NAN)), None);
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let cloth =
            PropertyDefinition::color("tablecloth", "Tablecloth Color", SerializableColor::white());
        assert!(cloth.schema.conform(PropertyValue::Number(1.0)).is_none());
        assert!(cloth
            .schema
            .conform(PropertyValue::Color(SerializableColor::black()))
            .is_some());
    }

    #[test]
    fn test_enum_membership() {
        let event = PropertyDefinition::enumeration(
            "eventType",
            "Event Type",
            "wedding",
            &[("wedding", "Wedding"), ("corporate", "Corporate")],
        );
        assert!(event.schema.conform(PropertyValue::Enum("corporate".into())).is_some());
        assert!(event.schema.conform(PropertyValue::Enum("rave".into())).is_none());
    }

    #[test]
    fn test_negative_length_rejected() {
        let width = PropertyDefinition::length("width", "Width", 90.0);
        assert!(width
            .schema
            .conform(PropertyValue::LengthMeasure(LengthMeasure::cm(-1.0)))
            .is_none());
    }

    #[test]
    fn test_length_unit_conversion() {
        assert!((LengthMeasure::new(1.5, LengthUnit::M).in_cm() - 150.0).abs() < 1e-9);
        assert!((LengthMeasure::new(10.0, LengthUnit::Mm).in_cm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_definition_json_shape() {
        let json = r##"{"name":"tablecloth","label":"Tablecloth Color","type":"color","default":"#ffffff"}"##;
        let def: PropertyDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.kind(), PropertyKind::Color);

        let value =
            serde_json::to_value(PropertyValue::LengthMeasure(LengthMeasure::cm(90.0))).unwrap();
        assert_eq!(value["type"], "length-measure");
        assert_eq!(value["value"]["unit"], "cm");
    }

    #[test]
    fn test_display() {
        assert_eq!(PropertyValue::Number(8.0).to_string(), "8");
        assert_eq!(
            PropertyValue::LengthMeasure(LengthMeasure::cm(120.0)).to_string(),
            "120cm"
        );
    }
}
