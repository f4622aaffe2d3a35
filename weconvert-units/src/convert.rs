//! Conversion through the base unit

use serde::{Serialize, Deserialize};
use weconvert_core::ConvertError;
use crate::Category;
use crate::unit::{ConversionUnit, UnitId};

/// Convert a value between two units of the same category.
///
/// Goes through the category's base unit: `to.from_base(from.to_base(value))`.
/// No rounding is applied.
pub fn convert<U: ConversionUnit>(value: f64, from: U, to: U) -> f64 {
    to.from_base(from.to_base(value))
}

/// Convert a value between two tagged units.
///
/// Fails when the units belong to different categories, or when a finite
/// value converts to something that no longer fits in an f64.
pub fn convert_units(value: f64, from: UnitId, to: UnitId) -> Result<f64, ConvertError> {
    ConversionRequest::new(value, from, to)?.try_execute()
}

/// Convert a value from a unit to its category's base unit
pub fn to_base(value: f64, unit: UnitId) -> f64 {
    unit.to_base(value)
}

/// Convert a value from the category's base unit to `unit`
pub fn from_base(value: f64, unit: UnitId) -> f64 {
    unit.from_base(value)
}

/// A validated conversion: both units belong to `category`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    category: Category,
    from: UnitId,
    to: UnitId,
    value: f64,
}

impl ConversionRequest {
    pub fn new(value: f64, from: UnitId, to: UnitId) -> Result<Self, ConvertError> {
        if !from.is_compatible(&to) {
            return Err(ConvertError::incompatible(from.name(), to.name()));
        }
        Ok(ConversionRequest {
            category: from.category(),
            from,
            to,
            value,
        })
    }

    /// Build a request from unit names that must be members of `category`
    pub fn from_names(
        category: Category,
        from: &str,
        to: &str,
        value: f64,
    ) -> Result<Self, ConvertError> {
        let from = category
            .unit(from)
            .ok_or_else(|| ConvertError::invalid_selection(category.name(), from))?;
        let to = category
            .unit(to)
            .ok_or_else(|| ConvertError::invalid_selection(category.name(), to))?;
        Ok(ConversionRequest { category, from, to, value })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn from(&self) -> UnitId {
        self.from
    }

    pub fn to(&self) -> UnitId {
        self.to
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn execute(&self) -> f64 {
        self.to.from_base(self.from.to_base(self.value))
    }

    /// Like `execute`, but a non-finite result is an `InvalidValue`
    pub fn try_execute(&self) -> Result<f64, ConvertError> {
        let converted = self.execute();
        if !converted.is_finite() {
            return Err(ConvertError::InvalidValue(format!(
                "{:e} {} is out of range in {}",
                self.value, self.from, self.to
            )));
        }
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{LengthUnit, TemperatureUnit, TimeUnit, VolumeUnit};

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_close(convert(0.0, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit), 32.0);
        assert_close(convert(100.0, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit), 212.0);
        assert_close(convert(-40.0, TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius), -40.0);
    }

    #[test]
    fn test_kelvin() {
        assert_close(convert(0.0, TemperatureUnit::Kelvin, TemperatureUnit::Celsius), -273.15);
        assert_close(convert(32.0, TemperatureUnit::Fahrenheit, TemperatureUnit::Kelvin), 273.15);
    }

    #[test]
    fn test_length() {
        assert_eq!(convert(1.0, LengthUnit::KiloMeter, LengthUnit::Meter), 1000.0);
        assert_close(convert(1.0, LengthUnit::Mile, LengthUnit::Feet), 1609.34 / 0.3048);
        assert_close(convert(3.0, LengthUnit::Feet, LengthUnit::Yard), 1.0);
    }

    #[test]
    fn test_time() {
        assert_eq!(convert(60.0, TimeUnit::Minute, TimeUnit::Second), 3600.0);
        assert_close(convert(2.0, TimeUnit::Day, TimeUnit::Hour), 48.0);
    }

    #[test]
    fn test_volume() {
        assert_eq!(convert(1.0, VolumeUnit::Gallon, VolumeUnit::Milliliter), 3785.41);
        assert_close(convert(2.0, VolumeUnit::Cup, VolumeUnit::Pint), 1.0);
    }

    #[test]
    fn test_identity_for_every_unit() {
        for category in Category::all() {
            for unit in category.units() {
                for v in [-273.15, -1.5, 0.0, 1.0, 42.0, 1e9] {
                    assert_close(convert_units(v, unit, unit).unwrap(), v);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_for_every_pair() {
        for category in Category::all() {
            for a in category.units() {
                for b in category.units() {
                    for v in [-40.0, 0.0, 0.1, 98.6, 12345.678] {
                        let there = convert_units(v, a, b).unwrap();
                        let back = convert_units(there, b, a).unwrap();
                        assert_close(back, v);
                    }
                }
            }
        }
    }

    #[test]
    fn test_cross_category_rejected() {
        let err = convert_units(1.0, TemperatureUnit::Celsius.id(), LengthUnit::Meter.id());
        assert_eq!(err, Err(ConvertError::incompatible("Celsius", "Meter")));
    }

    #[test]
    fn test_base_helpers() {
        assert_eq!(to_base(2.0, TimeUnit::Hour.id()), 7200.0);
        assert_eq!(from_base(7200.0, TimeUnit::Hour.id()), 2.0);
    }

    #[test]
    fn test_request_from_names() {
        let req = ConversionRequest::from_names(Category::Length, "Mile", "Meter", 2.0).unwrap();
        assert_eq!(req.category(), Category::Length);
        assert_eq!(req.execute(), 3218.68);

        let err = ConversionRequest::from_names(Category::Length, "Celsius", "Meter", 2.0);
        assert_eq!(err, Err(ConvertError::invalid_selection("Length", "Celsius")));
    }

    #[test]
    fn test_overflow_rejected() {
        let err = convert_units(1e308, VolumeUnit::Gallon.id(), VolumeUnit::Milliliter.id());
        assert_eq!(
            err,
            Err(ConvertError::InvalidValue("1e308 Gallon is out of range in Milliliter".to_string()))
        );
        assert!(convert_units(1e308, TemperatureUnit::Celsius.id(), TemperatureUnit::Fahrenheit.id()).is_err());

        // the reverse direction shrinks and stays finite
        let back = convert_units(1e308, VolumeUnit::Milliliter.id(), VolumeUnit::Gallon.id()).unwrap();
        assert_close(back, 1e308 / 3785.41);
    }
}
