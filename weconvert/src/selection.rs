//! Selection state behind the conversion form
//!
//! Holds the active category, the chosen input and output units and the
//! entered value. Every setter ends with `recompute`, which refreshes the
//! converted value. A change whose conversion would overflow to a
//! non-finite result is rejected and leaves the state as it was.
//!
//! The checked setters keep two invariants: both unit names are members of
//! the active category, and the output unit differs from the input unit.
//! Switching category resets both selections to the new category's first
//! two units.

use serde::Serialize;
use tracing::{debug, info, warn};
use weconvert_core::ConvertError;
use weconvert_units::{parse_amount, Category, ConversionRequest};

/// Current form selections
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    category: Category,
    input_unit: String,
    output_unit: String,
    input_value: f64,
    output_value: f64,
}

impl SelectionState {
    /// Temperature, Celsius to Fahrenheit, value 0
    pub fn new() -> Self {
        Self::for_category(Category::Temperature)
    }

    /// Fresh state for `category`: first unit in, second unit out, value 0
    pub fn for_category(category: Category) -> Self {
        let (input, output) = default_pair(category);
        let mut state = SelectionState {
            category,
            input_unit: input.to_string(),
            output_unit: output.to_string(),
            input_value: 0.0,
            output_value: 0.0,
        };
        state.recompute();
        state
    }

    /// Build a state from raw unit names without checking them.
    ///
    /// Names outside `category` are kept as given; the converted value then
    /// falls back to the input value (see `converted_value_or_input`).
    pub fn from_names(category: Category, input_unit: &str, output_unit: &str, value: f64) -> Self {
        let mut state = SelectionState {
            category,
            input_unit: input_unit.to_string(),
            output_unit: output_unit.to_string(),
            input_value: value,
            output_value: value,
        };
        state.recompute();
        state
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn input_unit(&self) -> &str {
        &self.input_unit
    }

    pub fn output_unit(&self) -> &str {
        &self.output_unit
    }

    pub fn input_value(&self) -> f64 {
        self.input_value
    }

    /// Units offered for the input selection
    pub fn input_units(&self) -> Vec<&'static str> {
        self.category.unit_names()
    }

    /// Units offered for the output selection: the input list without the
    /// current input unit, order kept
    pub fn output_units(&self) -> Vec<&'static str> {
        self.input_units()
            .into_iter()
            .filter(|name| *name != self.input_unit)
            .collect()
    }

    /// Switch category, resetting both unit selections when it changes.
    ///
    /// The entered value is kept, so the switch fails if that value
    /// overflows in the new category's default pair.
    pub fn select_category(&mut self, category: Category) -> Result<(), ConvertError> {
        if category == self.category {
            return Ok(());
        }
        let (input, output) = default_pair(category);
        let from = self.category;
        self.apply(|s| {
            s.category = category;
            s.input_unit = input.to_string();
            s.output_unit = output.to_string();
        })?;
        info!(from = %from, to = %category, "category changed");
        Ok(())
    }

    /// Select the input unit.
    ///
    /// If it equals the current output unit, the output moves to the first
    /// remaining unit.
    pub fn select_input_unit(&mut self, name: &str) -> Result<(), ConvertError> {
        let unit = self.member(name)?;
        self.apply(|s| {
            s.input_unit = unit.to_string();
            if s.output_unit == s.input_unit || !s.category.contains(&s.output_unit) {
                if let Some(first) = s.output_units().first() {
                    s.output_unit = first.to_string();
                }
            }
        })
    }

    /// Select the output unit; it must be one of `output_units()`
    pub fn select_output_unit(&mut self, name: &str) -> Result<(), ConvertError> {
        let unit = self.member(name)?;
        if unit == self.input_unit {
            return Err(ConvertError::invalid_selection(self.category.name(), unit));
        }
        self.apply(|s| s.output_unit = unit.to_string())
    }

    /// Set the value to convert; non-finite values, and values whose
    /// conversion is not finite, are rejected
    pub fn set_value(&mut self, value: f64) -> Result<(), ConvertError> {
        if !value.is_finite() {
            return Err(ConvertError::InvalidValue(value.to_string()));
        }
        self.apply(|s| s.input_value = value)
    }

    /// Set the value from entered text
    pub fn set_value_text(&mut self, text: &str) -> Result<(), ConvertError> {
        self.set_value(parse_amount(text)?)
    }

    /// Resolve the selections into a conversion request
    pub fn request(&self) -> Result<ConversionRequest, ConvertError> {
        ConversionRequest::from_names(
            self.category,
            &self.input_unit,
            &self.output_unit,
            self.input_value,
        )
    }

    /// Whether both selections are members of the active category and differ
    pub fn is_valid(&self) -> bool {
        self.input_unit != self.output_unit && self.request().is_ok()
    }

    /// The converted value as of the last recompute
    pub fn converted_value(&self) -> f64 {
        self.output_value
    }

    /// Convert the input value, or return it unconverted when a selected
    /// unit is not a member of the active category.
    ///
    /// Only states built with `from_names` can hit the fallback.
    pub fn converted_value_or_input(&self) -> f64 {
        match self.request() {
            Ok(request) => request.execute(),
            Err(e) => {
                warn!(error = %e, "unit lookup failed, showing the input value unconverted");
                self.input_value
            }
        }
    }

    /// Refresh the converted value from the current selections
    pub fn recompute(&mut self) {
        self.output_value = self.converted_value_or_input();
        debug!(
            category = %self.category,
            input_unit = %self.input_unit,
            output_unit = %self.output_unit,
            input = self.input_value,
            output = self.output_value,
            "recomputed"
        );
    }

    /// Serializable snapshot for the presentation layer
    pub fn view(&self) -> FormView {
        FormView {
            category: self.category,
            categories: Category::all().to_vec(),
            input_unit: self.input_unit.clone(),
            output_unit: self.output_unit.clone(),
            input_units: self.input_units(),
            output_units: self.output_units(),
            input_value: self.input_value,
            output_value: self.output_value,
        }
    }

    /// Run `change` on a copy and keep it only if the new selections still
    /// convert to a finite value
    fn apply<F: FnOnce(&mut SelectionState)>(&mut self, change: F) -> Result<(), ConvertError> {
        let mut next = self.clone();
        change(&mut next);
        if let Ok(request) = next.request() {
            request.try_execute()?;
        }
        next.recompute();
        *self = next;
        Ok(())
    }

    fn member(&self, name: &str) -> Result<&'static str, ConvertError> {
        self.category
            .unit(name.trim())
            .map(|u| u.name())
            .ok_or_else(|| ConvertError::invalid_selection(self.category.name(), name.trim()))
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the form displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub category: Category,
    pub categories: Vec<Category>,
    pub input_unit: String,
    pub output_unit: String,
    pub input_units: Vec<&'static str>,
    pub output_units: Vec<&'static str>,
    pub input_value: f64,
    pub output_value: f64,
}

fn default_pair(category: Category) -> (&'static str, &'static str) {
    let names = category.unit_names();
    // every category has at least two units
    (names[0], names[1])
}
