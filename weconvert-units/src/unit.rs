//! The shared conversion capability and the tagged unit identifier

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::Category;
use crate::units::{LengthUnit, TemperatureUnit, TimeUnit, VolumeUnit};

/// A unit that converts to and from its category's base unit.
///
/// Implemented once per category enum; `convert` is generic over it, so two
/// units of different categories can never be mixed at this level.
pub trait ConversionUnit: Copy + Eq + fmt::Debug + 'static {
    /// Category every variant of the implementing enum belongs to
    const CATEGORY: Category;

    /// All units of the category in declaration order
    fn all() -> &'static [Self];

    /// Display name, identical to the variant name (e.g. "KiloMeter")
    fn name(&self) -> &'static str;

    /// Short symbol (e.g. "km")
    fn symbol(&self) -> &'static str;

    /// Convert a value in this unit to the base unit
    fn to_base(&self, value: f64) -> f64;

    /// Convert a value in the base unit to this unit
    fn from_base(&self, value: f64) -> f64;

    /// Tag this unit with its category
    fn id(&self) -> UnitId;

    /// Look up a unit by its exact name
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|u| u.name() == name)
    }
}

/// A unit paired with its category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "unit")]
pub enum UnitId {
    Temperature(TemperatureUnit),
    Length(LengthUnit),
    Time(TimeUnit),
    Volume(VolumeUnit),
}

impl UnitId {
    pub fn category(&self) -> Category {
        match self {
            UnitId::Temperature(_) => Category::Temperature,
            UnitId::Length(_) => Category::Length,
            UnitId::Time(_) => Category::Time,
            UnitId::Volume(_) => Category::Volume,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnitId::Temperature(u) => u.name(),
            UnitId::Length(u) => u.name(),
            UnitId::Time(u) => u.name(),
            UnitId::Volume(u) => u.name(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnitId::Temperature(u) => u.symbol(),
            UnitId::Length(u) => u.symbol(),
            UnitId::Time(u) => u.symbol(),
            UnitId::Volume(u) => u.symbol(),
        }
    }

    pub fn to_base(&self, value: f64) -> f64 {
        match self {
            UnitId::Temperature(u) => u.to_base(value),
            UnitId::Length(u) => u.to_base(value),
            UnitId::Time(u) => u.to_base(value),
            UnitId::Volume(u) => u.to_base(value),
        }
    }

    pub fn from_base(&self, value: f64) -> f64 {
        match self {
            UnitId::Temperature(u) => u.from_base(value),
            UnitId::Length(u) => u.from_base(value),
            UnitId::Time(u) => u.from_base(value),
            UnitId::Volume(u) => u.from_base(value),
        }
    }

    /// Check if two units can be converted into each other
    pub fn is_compatible(&self, other: &UnitId) -> bool {
        self.category() == other.category()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatible_units() {
        let m = LengthUnit::Meter.id();
        let mi = LengthUnit::Mile.id();
        let s = TimeUnit::Second.id();

        assert!(m.is_compatible(&mi));
        assert!(!m.is_compatible(&s));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(LengthUnit::from_name("Yard"), Some(LengthUnit::Yard));
        assert_eq!(LengthUnit::from_name("Celsius"), None);
    }

    #[test]
    fn test_unit_id_dispatch() {
        let km = UnitId::Length(LengthUnit::KiloMeter);
        assert_eq!(km.category(), Category::Length);
        assert_eq!(km.name(), "KiloMeter");
        assert_eq!(km.symbol(), "km");
        assert_eq!(km.to_base(2.0), 2000.0);
        assert_eq!(km.from_base(500.0), 0.5);
        assert_eq!(format!("{}", km), "KiloMeter");
    }

    #[test]
    fn test_unit_id_serialization() {
        let id = UnitId::Volume(VolumeUnit::Gallon);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#"{"category":"Volume","unit":"Gallon"}"#);

        let back: UnitId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
