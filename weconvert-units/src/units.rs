//! Unit definitions - one enum per category, plus a registry of names,
//! symbols and aliases

use std::collections::HashMap;
use std::sync::LazyLock;
use serde::{Serialize, Deserialize};
use crate::Category;
use crate::unit::{ConversionUnit, UnitId};

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

// ============ temperature (base: Celsius) ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl ConversionUnit for TemperatureUnit {
    const CATEGORY: Category = Category::Temperature;

    fn all() -> &'static [Self] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit, TemperatureUnit::Kelvin]
    }

    fn name(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "Celsius",
            TemperatureUnit::Fahrenheit => "Fahrenheit",
            TemperatureUnit::Kelvin => "Kelvin",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    fn to_base(&self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * (5.0 / 9.0),
            TemperatureUnit::Kelvin => value - 273.15,
        }
    }

    fn from_base(&self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => value * (9.0 / 5.0) + 32.0,
            TemperatureUnit::Kelvin => value + 273.15,
        }
    }

    fn id(&self) -> UnitId {
        UnitId::Temperature(*self)
    }
}

// ============ length (base: Meter) ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    Meter,
    KiloMeter,
    Feet,
    Yard,
    Mile,
}

impl LengthUnit {
    /// Meters per unit
    fn factor(&self) -> f64 {
        match self {
            LengthUnit::Meter => 1.0,
            LengthUnit::KiloMeter => 1000.0,
            LengthUnit::Feet => 0.3048,
            LengthUnit::Yard => 0.9144,
            LengthUnit::Mile => 1609.34,
        }
    }
}

impl ConversionUnit for LengthUnit {
    const CATEGORY: Category = Category::Length;

    fn all() -> &'static [Self] {
        &[
            LengthUnit::Meter,
            LengthUnit::KiloMeter,
            LengthUnit::Feet,
            LengthUnit::Yard,
            LengthUnit::Mile,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            LengthUnit::Meter => "Meter",
            LengthUnit::KiloMeter => "KiloMeter",
            LengthUnit::Feet => "Feet",
            LengthUnit::Yard => "Yard",
            LengthUnit::Mile => "Mile",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Meter => "m",
            LengthUnit::KiloMeter => "km",
            LengthUnit::Feet => "ft",
            LengthUnit::Yard => "yd",
            LengthUnit::Mile => "mi",
        }
    }

    fn to_base(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Meter => value,
            _ => value * self.factor(),
        }
    }

    fn from_base(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Meter => value,
            _ => value / self.factor(),
        }
    }

    fn id(&self) -> UnitId {
        UnitId::Length(*self)
    }
}

// ============ time (base: Second) ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    /// Seconds per unit
    fn factor(&self) -> f64 {
        match self {
            TimeUnit::Second => 1.0,
            TimeUnit::Minute => 60.0,
            TimeUnit::Hour => 3600.0,
            TimeUnit::Day => 86400.0,
        }
    }
}

impl ConversionUnit for TimeUnit {
    const CATEGORY: Category = Category::Time;

    fn all() -> &'static [Self] {
        &[TimeUnit::Second, TimeUnit::Minute, TimeUnit::Hour, TimeUnit::Day]
    }

    fn name(&self) -> &'static str {
        match self {
            TimeUnit::Second => "Second",
            TimeUnit::Minute => "Minute",
            TimeUnit::Hour => "Hour",
            TimeUnit::Day => "Day",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Minute => "min",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
        }
    }

    fn to_base(&self, value: f64) -> f64 {
        match self {
            TimeUnit::Second => value,
            _ => value * self.factor(),
        }
    }

    fn from_base(&self, value: f64) -> f64 {
        match self {
            TimeUnit::Second => value,
            _ => value / self.factor(),
        }
    }

    fn id(&self) -> UnitId {
        UnitId::Time(*self)
    }
}

// ============ volume (base: Milliliter) ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeUnit {
    Milliliter,
    Liter,
    Cup,
    Pint,
    Gallon,
}

impl VolumeUnit {
    /// Milliliters per unit (US customary cup, pint and gallon)
    fn factor(&self) -> f64 {
        match self {
            VolumeUnit::Milliliter => 1.0,
            VolumeUnit::Liter => 1000.0,
            VolumeUnit::Cup => 236.588,
            VolumeUnit::Pint => 473.176,
            VolumeUnit::Gallon => 3785.41,
        }
    }
}

impl ConversionUnit for VolumeUnit {
    const CATEGORY: Category = Category::Volume;

    fn all() -> &'static [Self] {
        &[
            VolumeUnit::Milliliter,
            VolumeUnit::Liter,
            VolumeUnit::Cup,
            VolumeUnit::Pint,
            VolumeUnit::Gallon,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "Milliliter",
            VolumeUnit::Liter => "Liter",
            VolumeUnit::Cup => "Cup",
            VolumeUnit::Pint => "Pint",
            VolumeUnit::Gallon => "Gallon",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "mL",
            VolumeUnit::Liter => "L",
            VolumeUnit::Cup => "cup",
            VolumeUnit::Pint => "pt",
            VolumeUnit::Gallon => "gal",
        }
    }

    fn to_base(&self, value: f64) -> f64 {
        match self {
            VolumeUnit::Milliliter => value,
            _ => value * self.factor(),
        }
    }

    fn from_base(&self, value: f64) -> f64 {
        match self {
            VolumeUnit::Milliliter => value,
            _ => value / self.factor(),
        }
    }

    fn id(&self) -> UnitId {
        UnitId::Volume(*self)
    }
}

// ============ registry ============

/// Registry of all known units, keyed by name, symbol and alias
pub struct UnitRegistry {
    exact: HashMap<String, UnitId>,
    folded: HashMap<String, UnitId>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            exact: HashMap::new(),
            folded: HashMap::new(),
        };
        registry.register_all_units();
        registry
    }

    /// Get a unit by name, symbol or alias.
    ///
    /// Exact matches win; otherwise the lookup ignores case, so "KM" and
    /// "kilometers" both resolve.
    pub fn get(&self, symbol: &str) -> Option<UnitId> {
        let symbol = symbol.trim();
        if let Some(unit) = self.exact.get(symbol) {
            return Some(*unit);
        }
        self.folded.get(&symbol.to_lowercase()).copied()
    }

    fn register(&mut self, unit: UnitId) {
        self.alias(unit.name(), unit);
        self.alias(unit.symbol(), unit);
    }

    fn alias(&mut self, alias: &str, unit: UnitId) {
        self.exact.insert(alias.to_string(), unit);
        self.folded.insert(alias.to_lowercase(), unit);
    }

    fn register_all_units(&mut self) {
        for category in Category::all() {
            for unit in category.units() {
                self.register(unit);
            }
        }
        self.register_temperature_aliases();
        self.register_length_aliases();
        self.register_time_aliases();
        self.register_volume_aliases();
    }

    fn register_temperature_aliases(&mut self) {
        let c = TemperatureUnit::Celsius.id();
        let f = TemperatureUnit::Fahrenheit.id();
        let k = TemperatureUnit::Kelvin.id();
        self.alias("C", c);
        self.alias("degC", c);
        self.alias("centigrade", c);
        self.alias("F", f);
        self.alias("degF", f);
        self.alias("kelvins", k);
    }

    fn register_length_aliases(&mut self) {
        let m = LengthUnit::Meter.id();
        let km = LengthUnit::KiloMeter.id();
        let ft = LengthUnit::Feet.id();
        let yd = LengthUnit::Yard.id();
        let mi = LengthUnit::Mile.id();
        self.alias("meters", m);
        self.alias("metre", m);
        self.alias("metres", m);
        self.alias("kilometers", km);
        self.alias("kilometre", km);
        self.alias("kilometres", km);
        self.alias("foot", ft);
        self.alias("yards", yd);
        self.alias("miles", mi);
    }

    fn register_time_aliases(&mut self) {
        let s = TimeUnit::Second.id();
        let min = TimeUnit::Minute.id();
        let h = TimeUnit::Hour.id();
        let d = TimeUnit::Day.id();
        self.alias("sec", s);
        self.alias("seconds", s);
        self.alias("minutes", min);
        self.alias("hr", h);
        self.alias("hours", h);
        self.alias("days", d);
    }

    fn register_volume_aliases(&mut self) {
        let ml = VolumeUnit::Milliliter.id();
        let l = VolumeUnit::Liter.id();
        let cup = VolumeUnit::Cup.id();
        let pt = VolumeUnit::Pint.id();
        let gal = VolumeUnit::Gallon.id();
        self.alias("milliliters", ml);
        self.alias("millilitre", ml);
        self.alias("liters", l);
        self.alias("litre", l);
        self.alias("litres", l);
        self.alias("cups", cup);
        self.alias("pints", pt);
        self.alias("gallons", gal);
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
