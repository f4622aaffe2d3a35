//! WeConvert Units - Unit enumerations and conversion
//!
//! Each category is a closed set of units with a base unit every conversion
//! passes through:
//! - Temperature (Celsius, Fahrenheit, Kelvin), base Celsius
//! - Length (Meter, KiloMeter, Feet, Yard, Mile), base Meter
//! - Time (Second, Minute, Hour, Day), base Second
//! - Volume (Milliliter, Liter, Cup, Pint, Gallon), base Milliliter

mod category;
mod unit;
mod units;
mod convert;
mod parse;

pub use category::Category;
pub use unit::{ConversionUnit, UnitId};
pub use units::{LengthUnit, TemperatureUnit, TimeUnit, VolumeUnit, UnitRegistry, UNITS};
pub use convert::{convert, convert_units, from_base, to_base, ConversionRequest};
pub use parse::{parse_amount, parse_conversion, parse_quantity_string, parse_unit, parse_unit_in};
