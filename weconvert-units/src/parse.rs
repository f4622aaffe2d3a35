//! Parsing of unit names, conversion specs and entered amounts

use weconvert_core::ConvertError;
use crate::Category;
use crate::unit::UnitId;
use crate::units::UNITS;

/// Parse a unit name, symbol or alias into a unit
pub fn parse_unit(s: &str) -> Result<UnitId, ConvertError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ConvertError::UnknownUnit(String::new()));
    }
    UNITS.get(s).ok_or_else(|| ConvertError::UnknownUnit(s.to_string()))
}

/// Parse a unit that must belong to `category`.
///
/// A known unit from another category is an invalid selection rather than an
/// unknown unit.
pub fn parse_unit_in(category: Category, s: &str) -> Result<UnitId, ConvertError> {
    let unit = parse_unit(s)?;
    if unit.category() != category {
        return Err(ConvertError::invalid_selection(category.name(), unit.name()));
    }
    Ok(unit)
}

/// Parse a conversion spec like "km->mi", "km → mi", "F to C" or "L in gal"
pub fn parse_conversion(s: &str) -> Result<(UnitId, UnitId), ConvertError> {
    let s = s.trim();

    let (from, to) = split_conversion(s)
        .ok_or_else(|| ConvertError::ParseError(format!("expected \"from->to\", got \"{}\"", s)))?;

    let from = parse_unit(from)?;
    let to = parse_unit(to)?;

    if !from.is_compatible(&to) {
        return Err(ConvertError::incompatible(from.name(), to.name()));
    }

    Ok((from, to))
}

fn split_conversion(s: &str) -> Option<(&str, &str)> {
    for arrow in ["->", "→", "=>"] {
        if let Some((from, to)) = s.split_once(arrow) {
            return Some((from, to));
        }
    }
    for word in [" to ", " in ", " TO ", " IN "] {
        if let Some((from, to)) = s.split_once(word) {
            return Some((from, to));
        }
    }
    None
}

/// Parse an entered amount.
///
/// Accepts plain decimals and scientific notation; rejects empty, NaN and
/// infinite input.
pub fn parse_amount(s: &str) -> Result<f64, ConvertError> {
    let s = s.trim();
    let value: f64 = s
        .parse()
        .map_err(|_| ConvertError::InvalidValue(s.to_string()))?;
    if !value.is_finite() {
        return Err(ConvertError::InvalidValue(s.to_string()));
    }
    Ok(value)
}

/// Parse a quantity string like "5 km", "-40°F" or "1e-3 km" into value
/// and unit
pub fn parse_quantity_string(s: &str) -> Result<(f64, UnitId), ConvertError> {
    let s = s.trim();

    // Split where the number ends
    let mut split = 0;
    let mut prev = None;
    for (i, c) in s.char_indices() {
        let numeric = c.is_ascii_digit()
            || c == '.'
            || ((c == '-' || c == '+') && (i == 0 || matches!(prev, Some('e' | 'E'))))
            || ((c == 'e' || c == 'E') && i > 0 && starts_exponent(&s[i + 1..]));
        if !numeric {
            break;
        }
        split = i + c.len_utf8();
        prev = Some(c);
    }

    let (number, unit) = s.split_at(split);
    if number.is_empty() {
        return Err(ConvertError::ParseError(format!("no value in \"{}\"", s)));
    }

    Ok((parse_amount(number)?, parse_unit(unit)?))
}

/// Whether the text after an 'e' continues a number: a digit, or a sign
/// followed by a digit
fn starts_exponent(rest: &str) -> bool {
    let rest = rest.strip_prefix(|c| c == '-' || c == '+').unwrap_or(rest);
    rest.starts_with(|c: char| c.is_ascii_digit())
}
