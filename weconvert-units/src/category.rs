//! Conversion categories
//!
//! Every unit belongs to exactly one category, and every category converts
//! through a single base unit.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use weconvert_core::ConvertError;
use crate::unit::{ConversionUnit, UnitId};
use crate::units::{LengthUnit, TemperatureUnit, TimeUnit, VolumeUnit};

/// A closed grouping of mutually convertible units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Temperature,
    Length,
    Time,
    Volume,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 4] = [
        Category::Temperature,
        Category::Length,
        Category::Time,
        Category::Volume,
    ];

    pub fn all() -> &'static [Category] {
        &Self::ALL
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Temperature => "Temperature",
            Category::Length => "Length",
            Category::Time => "Time",
            Category::Volume => "Volume",
        }
    }

    /// The reference unit every conversion in this category passes through
    pub fn base_unit(&self) -> UnitId {
        match self {
            Category::Temperature => TemperatureUnit::Celsius.id(),
            Category::Length => LengthUnit::Meter.id(),
            Category::Time => TimeUnit::Second.id(),
            Category::Volume => VolumeUnit::Milliliter.id(),
        }
    }

    /// Units of this category in declaration order
    pub fn units(&self) -> Vec<UnitId> {
        match self {
            Category::Temperature => ids::<TemperatureUnit>(),
            Category::Length => ids::<LengthUnit>(),
            Category::Time => ids::<TimeUnit>(),
            Category::Volume => ids::<VolumeUnit>(),
        }
    }

    /// Unit names in declaration order, as offered for selection
    pub fn unit_names(&self) -> Vec<&'static str> {
        self.units().iter().map(|u| u.name()).collect()
    }

    pub fn unit_count(&self) -> usize {
        match self {
            Category::Temperature => TemperatureUnit::all().len(),
            Category::Length => LengthUnit::all().len(),
            Category::Time => TimeUnit::all().len(),
            Category::Volume => VolumeUnit::all().len(),
        }
    }

    /// Look up a unit of this category by its exact name
    pub fn unit(&self, name: &str) -> Option<UnitId> {
        self.units().into_iter().find(|u| u.name() == name)
    }

    /// Check whether `name` is a member of this category's unit set
    pub fn contains(&self, name: &str) -> bool {
        self.unit(name).is_some()
    }

    /// Parse a category name, ignoring case
    pub fn from_name(name: &str) -> Result<Category, ConvertError> {
        let trimmed = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConvertError::UnknownCategory(trimmed.to_string()))
    }
}

fn ids<U: ConversionUnit>() -> Vec<UnitId> {
    U::all().iter().map(|u| u.id()).collect()
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Category {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_name(s)
    }
}
