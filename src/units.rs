//! Unit tags and conversion into each field's canonical unit
//!
//! Gridpoint series carry WMO unit codes such as `wmoUnit:degC` or
//! `wmoUnit:km_h-1`. Every field is reported in one canonical unit: Celsius for
//! temperatures, percent for ratios, degrees for direction, m/s for speeds,
//! millimetres for precipitation and metres for visibility.

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::models::FieldName;

/// Physical quantity a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Temperature,
    Ratio,
    Angle,
    Speed,
    Length,
}

/// Units understood by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Celsius,
    Fahrenheit,
    Kelvin,
    Percent,
    Degrees,
    MetersPerSecond,
    KilometersPerHour,
    Knots,
    MilesPerHour,
    Millimeters,
    Inches,
    Meters,
    Kilometers,
    Miles,
}

impl Unit {
    /// Parse a unit tag, with or without its `wmoUnit:` / `unit:` namespace
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let code = tag
            .trim()
            .strip_prefix("wmoUnit:")
            .or_else(|| tag.trim().strip_prefix("unit:"))
            .unwrap_or_else(|| tag.trim());

        let unit = match code {
            "degC" => Unit::Celsius,
            "degF" => Unit::Fahrenheit,
            "K" => Unit::Kelvin,
            "percent" => Unit::Percent,
            "degree_(angle)" => Unit::Degrees,
            "m_s-1" => Unit::MetersPerSecond,
            "km_h-1" => Unit::KilometersPerHour,
            "kn" => Unit::Knots,
            "mi_h-1" => Unit::MilesPerHour,
            "mm" => Unit::Millimeters,
            "in" => Unit::Inches,
            "m" => Unit::Meters,
            "km" => Unit::Kilometers,
            "mi" => Unit::Miles,
            _ => return None,
        };
        Some(unit)
    }

    #[must_use]
    pub fn quantity(self) -> Quantity {
        match self {
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => Quantity::Temperature,
            Unit::Percent => Quantity::Ratio,
            Unit::Degrees => Quantity::Angle,
            Unit::MetersPerSecond | Unit::KilometersPerHour | Unit::Knots | Unit::MilesPerHour => {
                Quantity::Speed
            }
            Unit::Millimeters | Unit::Inches | Unit::Meters | Unit::Kilometers | Unit::Miles => {
                Quantity::Length
            }
        }
    }

    /// Convert into the quantity's base unit (Celsius, percent, degrees, m/s, metres)
    fn to_base(self, value: f64) -> f64 {
        match self {
            Unit::Celsius | Unit::Percent | Unit::Degrees | Unit::MetersPerSecond | Unit::Meters => {
                value
            }
            Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            Unit::Kelvin => value - 273.15,
            Unit::KilometersPerHour => value / 3.6,
            Unit::Knots => value * 0.514_444,
            Unit::MilesPerHour => value * 0.447_04,
            Unit::Millimeters => value / 1000.0,
            Unit::Inches => value * 0.0254,
            Unit::Kilometers => value * 1000.0,
            Unit::Miles => value * 1609.344,
        }
    }

    fn from_base(self, value: f64) -> f64 {
        match self {
            Unit::Celsius | Unit::Percent | Unit::Degrees | Unit::MetersPerSecond | Unit::Meters => {
                value
            }
            Unit::Fahrenheit => value * 9.0 / 5.0 + 32.0,
            Unit::Kelvin => value + 273.15,
            Unit::KilometersPerHour => value * 3.6,
            Unit::Knots => value / 0.514_444,
            Unit::MilesPerHour => value / 0.447_04,
            Unit::Millimeters => value * 1000.0,
            Unit::Inches => value / 0.0254,
            Unit::Kilometers => value / 1000.0,
            Unit::Miles => value / 1609.344,
        }
    }
}

/// Canonical output unit of a field
#[must_use]
pub fn canonical_unit(field: FieldName) -> Unit {
    match field {
        FieldName::Temperature | FieldName::Dewpoint | FieldName::ApparentTemperature => {
            Unit::Celsius
        }
        FieldName::RelativeHumidity | FieldName::ProbabilityOfPrecipitation => Unit::Percent,
        FieldName::WindDirection => Unit::Degrees,
        FieldName::WindSpeed | FieldName::WindGust => Unit::MetersPerSecond,
        FieldName::QuantitativePrecipitation => Unit::Millimeters,
        FieldName::Visibility => Unit::Meters,
    }
}

/// Conversion from a series' declared unit into its field's canonical unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitConversion {
    pub from: Unit,
    pub to: Unit,
}

impl UnitConversion {
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        if self.from == self.to {
            return value;
        }
        self.to.from_base(self.from.to_base(value))
    }
}

/// Resolve a raw unit tag for `field`
///
/// Fails with a unit error when the tag is unknown or measures a different
/// quantity than the field.
pub fn canonicalize(field: FieldName, tag: &str) -> crate::Result<UnitConversion> {
    let from = Unit::parse(tag).ok_or_else(|| ForecastError::unit(field.api_key(), tag))?;
    let to = canonical_unit(field);

    if from.quantity() != to.quantity() {
        return Err(ForecastError::unit(field.api_key(), tag));
    }

    Ok(UnitConversion { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FieldName::Temperature, "wmoUnit:degC", 21.5, 21.5)]
    #[case(FieldName::Temperature, "wmoUnit:degF", 212.0, 100.0)]
    #[case(FieldName::Dewpoint, "wmoUnit:K", 273.15, 0.0)]
    #[case(FieldName::WindSpeed, "wmoUnit:km_h-1", 36.0, 10.0)]
    #[case(FieldName::WindGust, "wmoUnit:m_s-1", 7.5, 7.5)]
    #[case(FieldName::WindSpeed, "wmoUnit:mi_h-1", 10.0, 4.4704)]
    #[case(FieldName::QuantitativePrecipitation, "wmoUnit:mm", 2.5, 2.5)]
    #[case(FieldName::QuantitativePrecipitation, "wmoUnit:in", 1.0, 25.4)]
    #[case(FieldName::Visibility, "wmoUnit:km", 16.09, 16090.0)]
    #[case(FieldName::RelativeHumidity, "unit:percent", 80.0, 80.0)]
    #[case(FieldName::WindDirection, "degree_(angle)", 270.0, 270.0)]
    fn test_conversion(
        #[case] field: FieldName,
        #[case] tag: &str,
        #[case] input: f64,
        #[case] expected: f64,
    ) {
        let conversion = canonicalize(field, tag).unwrap();
        assert!(
            (conversion.apply(input) - expected).abs() < 1e-6,
            "{tag}: {} != {expected}",
            conversion.apply(input)
        );
    }

    #[test]
    fn test_unknown_unit_names_field_and_tag() {
        let err = canonicalize(FieldName::Temperature, "wmoUnit:furlong").unwrap_err();
        match err {
            ForecastError::Unit { field, unit } => {
                assert_eq!(field, "temperature");
                assert_eq!(unit, "wmoUnit:furlong");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unit_of_wrong_quantity_is_rejected() {
        let err = canonicalize(FieldName::Temperature, "wmoUnit:percent").unwrap_err();
        assert!(matches!(err, ForecastError::Unit { .. }));
    }

    #[test]
    fn test_identity_conversion_is_exact() {
        let conversion = canonicalize(FieldName::Temperature, "wmoUnit:degC").unwrap();
        assert_eq!(conversion.apply(0.1 + 0.2), 0.1 + 0.2);
    }
}
