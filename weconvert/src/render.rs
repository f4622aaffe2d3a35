//! Markdown renderer
//!
//! Renders the conversion form as markdown, one section per form group.

use weconvert_units::Category;
use crate::selection::SelectionState;

/// Display format for numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// At most N decimal places, trailing zeros trimmed (default)
    Decimal(u32),
    /// Significant figures with scientific notation for large/small values
    SigFigs(u32),
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::Decimal(6)
    }
}

impl NumberFormat {
    pub fn format(&self, value: f64) -> String {
        match *self {
            NumberFormat::Decimal(places) => as_decimal(value, places),
            NumberFormat::SigFigs(sigfigs) => as_sigfigs(value, sigfigs),
        }
    }
}

fn as_decimal(value: f64, places: u32) -> String {
    let text = format!("{:.prec$}", value, prec = places as usize);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    // "-0" after rounding
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

fn as_sigfigs(value: f64, sigfigs: u32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let sigfigs = sigfigs.max(1) as usize;
    let exp = value.abs().log10().floor() as i32;

    if (-3..=4).contains(&exp) {
        let decimal_places = if exp >= 0 {
            (sigfigs as i32 - exp - 1).max(0) as usize
        } else {
            sigfigs + (-exp - 1) as usize
        };
        format!("{:.prec$}", value, prec = decimal_places)
    } else {
        let mantissa = value / 10_f64.powi(exp);
        format!("{:.prec$}e{}", mantissa, exp, prec = sigfigs - 1)
    }
}

/// Form renderer
pub struct Renderer {
    format: NumberFormat,
}

impl Renderer {
    pub fn new() -> Self {
        Self { format: NumberFormat::default() }
    }

    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format_value(&self, value: f64) -> String {
        self.format.format(value)
    }

    /// Render the form for `state`
    pub fn render(&self, state: &SelectionState) -> String {
        let mut output = String::new();

        output.push_str("# WeConvert\n\n");

        output.push_str("## Select your conversion type\n\n");
        output.push_str(&choice_line(
            &Category::all().iter().map(|c| c.name()).collect::<Vec<_>>(),
            state.category().name(),
        ));

        output.push_str("## Select your unit\n\n");
        output.push_str("Input unit: ");
        output.push_str(&choice_line(&state.input_units(), state.input_unit()));
        output.push_str("Output unit: ");
        output.push_str(&choice_line(&state.output_units(), state.output_unit()));

        output.push_str("## The number you want to convert\n\n");
        output.push_str(&format!("{}\n\n", self.format_value(state.input_value())));

        output.push_str("## The Result of conversion:\n\n");
        output.push_str(&format!("{}\n", self.format_value(state.converted_value())));

        output
    }

    /// One-line summary of the form, e.g. "100 Celsius = 212 Fahrenheit"
    pub fn summary(&self, state: &SelectionState) -> String {
        self.format_conversion(
            state.input_value(),
            state.input_unit(),
            state.converted_value(),
            state.output_unit(),
        )
    }

    /// "{value} {from} = {converted} {to}" in this renderer's number format
    pub fn format_conversion(&self, value: f64, from: &str, converted: f64, to: &str) -> String {
        format!(
            "{} {} = {} {}",
            self.format_value(value),
            from,
            self.format_value(converted),
            to
        )
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a segmented choice with the selected option in bold
fn choice_line(options: &[&str], selected: &str) -> String {
    let parts: Vec<String> = options
        .iter()
        .map(|o| if *o == selected { format!("**{}**", o) } else { o.to_string() })
        .collect();
    format!("{}\n\n", parts.join(" | "))
}
