/*!
 * Value classification.
 *
 * Pure mapping from a raw value's label and kind to the semantic device
 * descriptor used during materialization. No state, no side effects.
 */
use serde::{Deserialize, Serialize};

use wavemesh_core::types::Value;

use crate::value::{RawValue, ValueKind};

/// Semantic unit/category assigned to a materialized device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Temperature in degrees Celsius
    Temperature,
    /// Relative humidity percentage
    Humidity,
    /// Battery charge percentage
    Battery,
    /// Luminance
    Luminance,
    /// Binary sensor state
    BinarySensor,
}

impl Dimension {
    /// The display unit for this dimension
    pub fn unit(self) -> &'static str {
        match self {
            Dimension::Temperature => "°C",
            Dimension::Humidity | Dimension::Battery => "%",
            Dimension::Luminance => "lux",
            Dimension::BinarySensor => "",
        }
    }

    /// The display category name for this dimension
    ///
    /// Battery readings are presented under the humidity category as a
    /// placeholder until a dedicated one exists upstream.
    pub fn display_category(self) -> &'static str {
        match self {
            Dimension::Temperature => "temperature",
            Dimension::Humidity | Dimension::Battery => "humidity",
            Dimension::Luminance => "luminance",
            Dimension::BinarySensor => "binary-sensor",
        }
    }
}

/// Value-shape normalization applied to readings before they are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transform {
    /// Convert a Fahrenheit reading to Celsius
    FahrenheitToCelsius,
    /// Pass the reading through unchanged
    Identity,
    /// Map boolean true to "0" and false to "1"
    ///
    /// The polarity inversion is carried over verbatim from the original
    /// mapping; see the classifier tests pinning it down.
    InvertedBinary,
}

impl Transform {
    /// Apply the transform to a reading
    ///
    /// Readings whose shape does not fit the transform pass through
    /// unchanged rather than erroring; transforms never fail.
    pub fn apply(self, value: &Value) -> Value {
        match self {
            Transform::FahrenheitToCelsius => match value.as_float() {
                Some(f) => Value::Float((f - 32.0) * 5.0 / 9.0),
                None => value.clone(),
            },
            Transform::Identity => value.clone(),
            Transform::InvertedBinary => match value.as_bool() {
                Some(true) => Value::String("0".to_string()),
                Some(false) => Value::String("1".to_string()),
                None => value.clone(),
            },
        }
    }
}

/// The outcome of classifying a raw value: what kind of device to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Semantic unit/category for the device
    pub dimension: Dimension,
    /// Transform applied to every reading routed to the device
    pub transform: Transform,
}

/// Classify a raw value into a device descriptor, or `None` when the value
/// has no defined semantic mapping.
///
/// Matching is case-insensitive substring matching against the label; the
/// rules are evaluated in a fixed priority order and the first match wins,
/// so a label containing several keywords resolves to the earliest rule.
pub fn classify(value: &RawValue) -> Option<DeviceDescriptor> {
    let label = value.label.to_lowercase();

    if label.contains("temperature") {
        return Some(DeviceDescriptor {
            dimension: Dimension::Temperature,
            transform: Transform::FahrenheitToCelsius,
        });
    }
    if label.contains("humidity") {
        return Some(DeviceDescriptor {
            dimension: Dimension::Humidity,
            transform: Transform::Identity,
        });
    }
    if label.contains("battery") && value.kind == ValueKind::Byte {
        return Some(DeviceDescriptor {
            dimension: Dimension::Battery,
            transform: Transform::Identity,
        });
    }
    if label.contains("luminance") {
        return Some(DeviceDescriptor {
            dimension: Dimension::Luminance,
            transform: Transform::Identity,
        });
    }
    if label.contains("sensor") && value.kind == ValueKind::Bool {
        return Some(DeviceDescriptor {
            dimension: Dimension::BinarySensor,
            transform: Transform::InvertedBinary,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Genre;

    fn raw(label: &str, kind: ValueKind, value: Value) -> RawValue {
        RawValue::new(0, label, kind, Genre::User, value)
    }

    #[test]
    fn test_temperature_rule() {
        let v = raw("Temperature", ValueKind::Decimal, Value::Float(98.6));
        let desc = classify(&v).unwrap();
        assert_eq!(desc.dimension, Dimension::Temperature);
        assert_eq!(desc.transform, Transform::FahrenheitToCelsius);
    }

    #[test]
    fn test_temperature_matches_substring_case_insensitive() {
        let v = raw(
            "Air TEMPERATURE reading",
            ValueKind::Decimal,
            Value::Float(70.0),
        );
        assert!(classify(&v).is_some());
    }

    #[test]
    fn test_humidity_rule() {
        let v = raw("Relative Humidity", ValueKind::Decimal, Value::Float(40.0));
        let desc = classify(&v).unwrap();
        assert_eq!(desc.dimension, Dimension::Humidity);
        assert_eq!(desc.transform, Transform::Identity);
    }

    #[test]
    fn test_battery_requires_byte_kind() {
        let v = raw("Battery Level", ValueKind::Byte, Value::Byte(80));
        let desc = classify(&v).unwrap();
        assert_eq!(desc.dimension, Dimension::Battery);

        let v = raw("Battery Level", ValueKind::Decimal, Value::Float(80.0));
        assert!(classify(&v).is_none());
    }

    #[test]
    fn test_luminance_rule() {
        let v = raw("Luminance", ValueKind::Decimal, Value::Float(120.0));
        let desc = classify(&v).unwrap();
        assert_eq!(desc.dimension, Dimension::Luminance);
    }

    #[test]
    fn test_binary_sensor_requires_bool_kind() {
        let v = raw("Door Sensor", ValueKind::Bool, Value::Bool(true));
        let desc = classify(&v).unwrap();
        assert_eq!(desc.dimension, Dimension::BinarySensor);
        assert_eq!(desc.transform, Transform::InvertedBinary);

        let v = raw("Sensor", ValueKind::Byte, Value::Byte(1));
        assert!(classify(&v).is_none());
    }

    #[test]
    fn test_rule_priority_humidity_before_battery() {
        // A label matching both patterns resolves via the humidity rule
        let v = raw("Humidity Battery", ValueKind::Byte, Value::Byte(40));
        let desc = classify(&v).unwrap();
        assert_eq!(desc.dimension, Dimension::Humidity);
    }

    #[test]
    fn test_no_match() {
        let v = raw("Switch", ValueKind::Bool, Value::Bool(false));
        assert!(classify(&v).is_none());

        let v = raw("Power Level", ValueKind::Byte, Value::Byte(0));
        assert!(classify(&v).is_none());
    }

    #[test]
    fn test_classify_is_idempotent() {
        let v = raw("Temperature", ValueKind::Decimal, Value::Float(72.0));
        let first = classify(&v);
        for _ in 0..10 {
            assert_eq!(classify(&v), first);
        }
    }

    #[test]
    fn test_fahrenheit_to_celsius_boundaries() {
        let t = Transform::FahrenheitToCelsius;
        assert_eq!(t.apply(&Value::Float(32.0)), Value::Float(0.0));
        assert_eq!(t.apply(&Value::Float(212.0)), Value::Float(100.0));

        // Integer readings convert through the same path
        assert_eq!(t.apply(&Value::Int(32)), Value::Float(0.0));

        // Non-numeric readings pass through unchanged
        let s = Value::String("n/a".to_string());
        assert_eq!(t.apply(&s), s);
    }

    #[test]
    fn test_inverted_binary_transform() {
        // Polarity is inverted on purpose: true -> "0", false -> "1"
        let t = Transform::InvertedBinary;
        assert_eq!(t.apply(&Value::Bool(true)), Value::String("0".to_string()));
        assert_eq!(t.apply(&Value::Bool(false)), Value::String("1".to_string()));

        let b = Value::Byte(1);
        assert_eq!(t.apply(&b), b);
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(Dimension::Temperature.unit(), "°C");
        assert_eq!(Dimension::Humidity.unit(), "%");
        // Battery reuses the humidity display category as a placeholder
        assert_eq!(Dimension::Battery.display_category(), "humidity");
        assert_eq!(Dimension::BinarySensor.display_category(), "binary-sensor");
    }
}
