//! Tool definitions and dispatch

use serde_json::{json, Value as JsonValue};
use tracing::debug;
use weconvert::{Category, ConvertError, ErrorReport, UnitId, WeConvert};
use weconvert_units::{
    convert_units, parse_amount, parse_conversion, parse_quantity_string, parse_unit, parse_unit_in,
};
use crate::McpError;

/// The `tools/list` result
pub fn list() -> JsonValue {
    let categories: Vec<&str> = Category::all().iter().map(|c| c.name()).collect();

    json!({
        "tools": [
            {
                "name": "list_categories",
                "description": "List conversion categories with their base unit and units.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "list_units",
                "description": "List the units of a category in display order.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "enum": categories }
                    },
                    "required": ["category"]
                }
            },
            {
                "name": "output_units",
                "description": "List the units a value can be converted to, given the input unit.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "enum": categories },
                        "input_unit": { "type": "string" }
                    },
                    "required": ["category", "input_unit"]
                }
            },
            {
                "name": "convert",
                "description": "Convert a value between two units of the same category. Units may be names (\"KiloMeter\"), symbols (\"km\") or aliases (\"kilometers\"). Give either value and from_unit, or a quantity like \"5 km\".",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": ["number", "string"] },
                        "from_unit": { "type": "string" },
                        "quantity": {
                            "type": "string",
                            "description": "Value and unit together, e.g. \"1e-3 km\"; replaces value and from_unit"
                        },
                        "to_unit": { "type": "string" },
                        "category": {
                            "type": "string",
                            "enum": categories,
                            "description": "Restrict unit lookup to this category"
                        }
                    },
                    "required": ["to_unit"]
                }
            },
            {
                "name": "in_units",
                "description": "Convert a value using a conversion spec like \"km->mi\" or \"F to C\".",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": ["number", "string"] },
                        "conversion": { "type": "string" }
                    },
                    "required": ["value", "conversion"]
                }
            },
            {
                "name": "form",
                "description": "Show the conversion form.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "select_category",
                "description": "Switch the form's category. Resets both unit selections.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "enum": categories }
                    },
                    "required": ["category"]
                }
            },
            {
                "name": "select_input_unit",
                "description": "Select the form's input unit.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "unit": { "type": "string" }
                    },
                    "required": ["unit"]
                }
            },
            {
                "name": "select_output_unit",
                "description": "Select the form's output unit. Must differ from the input unit.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "unit": { "type": "string" }
                    },
                    "required": ["unit"]
                }
            },
            {
                "name": "set_value",
                "description": "Set the number to convert.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": ["number", "string"] }
                    },
                    "required": ["value"]
                }
            }
        ]
    })
}

/// Dispatch a `tools/call`
pub fn call(session: &mut WeConvert, name: &str, args: &JsonValue) -> Result<JsonValue, McpError> {
    debug!(tool = name, "tool call");
    match name {
        "list_categories" => Ok(tool_list_categories()),
        "list_units" => tool_list_units(args),
        "output_units" => tool_output_units(args),
        "convert" => tool_convert(session, args),
        "in_units" => tool_in_units(session, args),
        "form" => Ok(form_result(session)),
        "select_category" => tool_select_category(session, args),
        "select_input_unit" => {
            let unit = str_arg(args, "unit")?;
            Ok(form_update(session, |s| s.select_input_unit(unit)))
        }
        "select_output_unit" => {
            let unit = str_arg(args, "unit")?;
            Ok(form_update(session, |s| s.select_output_unit(unit)))
        }
        "set_value" => {
            let value = required_arg(args, "value")?;
            Ok(form_update(session, |s| s.set_value(number(value)?)))
        }
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn tool_list_categories() -> JsonValue {
    let categories: Vec<JsonValue> = Category::all()
        .iter()
        .map(|c| {
            json!({
                "name": c.name(),
                "base_unit": c.base_unit().name(),
                "units": c.unit_names(),
            })
        })
        .collect();

    let text = categories
        .iter()
        .map(|c| format!("{}: {}", c["name"].as_str().unwrap_or_default(), c["units"]))
        .collect::<Vec<_>>()
        .join("\n");

    json!({
        "content": [{ "type": "text", "text": text }],
        "categories": categories,
        "isError": false
    })
}

fn tool_list_units(args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = match Category::from_name(str_arg(args, "category")?) {
        Ok(c) => c,
        Err(e) => return Ok(error_result(&e)),
    };

    let units: Vec<JsonValue> = category
        .units()
        .iter()
        .map(|u| json!({ "name": u.name(), "symbol": u.symbol() }))
        .collect();

    Ok(json!({
        "content": [{ "type": "text", "text": category.unit_names().join(", ") }],
        "category": category,
        "base_unit": category.base_unit().name(),
        "units": units,
        "isError": false
    }))
}

fn tool_output_units(args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = str_arg(args, "category")?;
    let input = str_arg(args, "input_unit")?;
    let result = Category::from_name(category).and_then(|category| {
        let input = parse_unit_in(category, input)?;
        let names: Vec<&str> = category
            .unit_names()
            .into_iter()
            .filter(|n| *n != input.name())
            .collect();
        Ok(names)
    });

    Ok(match result {
        Ok(names) => json!({
            "content": [{ "type": "text", "text": names.join(", ") }],
            "units": names,
            "isError": false
        }),
        Err(e) => error_result(&e),
    })
}

/// Where `convert` reads its value and source unit from
enum Source<'a> {
    /// "5 km" in one string
    Quantity(&'a str),
    /// separate `value` and `from_unit`
    Parts(&'a JsonValue, &'a str),
}

fn tool_convert(session: &WeConvert, args: &JsonValue) -> Result<JsonValue, McpError> {
    let to = str_arg(args, "to_unit")?;
    let source = match args.get("quantity").and_then(|v| v.as_str()) {
        Some(quantity) => Source::Quantity(quantity),
        None => Source::Parts(required_arg(args, "value")?, str_arg(args, "from_unit")?),
    };

    let category = match args.get("category").and_then(|v| v.as_str()) {
        Some(raw) => match Category::from_name(raw) {
            Ok(c) => Some(c),
            Err(e) => return Ok(error_result(&e)),
        },
        None => None,
    };

    let source = match source {
        Source::Quantity(quantity) => parse_quantity_string(quantity)
            .and_then(|(value, from)| Ok((value, restrict(category, from)?))),
        Source::Parts(value, from) => {
            number(value).and_then(|value| Ok((value, restrict(category, parse_unit(from)?)?)))
        }
    };

    let result = source.and_then(|(value, from)| {
        let to = restrict(category, parse_unit(to)?)?;
        Ok((value, from, to, convert_units(value, from, to)?))
    });

    Ok(match result {
        Ok((value, from, to, converted)) => conversion_result(session, value, from.name(), to.name(), converted),
        Err(e) => error_result(&e),
    })
}

fn tool_in_units(session: &WeConvert, args: &JsonValue) -> Result<JsonValue, McpError> {
    let value = required_arg(args, "value")?;
    let conversion = str_arg(args, "conversion")?;

    let result = number(value).and_then(|value| {
        let (from, to) = parse_conversion(conversion)?;
        Ok((value, from, to, convert_units(value, from, to)?))
    });

    Ok(match result {
        Ok((value, from, to, converted)) => conversion_result(session, value, from.name(), to.name(), converted),
        Err(e) => error_result(&e),
    })
}

fn tool_select_category(session: &mut WeConvert, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = str_arg(args, "category")?;
    Ok(form_update(session, |s| s.select_category(Category::from_name(category)?)))
}

/// Apply `change` to the form; on failure the form is left as it was
fn form_update<F>(session: &mut WeConvert, change: F) -> JsonValue
where
    F: FnOnce(&mut weconvert::SelectionState) -> Result<(), ConvertError>,
{
    match change(session.state_mut()) {
        Ok(()) => form_result(session),
        Err(e) => {
            let mut result = error_result(&e);
            result["form"] = json!(session.state().view());
            result
        }
    }
}

fn form_result(session: &WeConvert) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": session.render() }],
        "form": session.state().view(),
        "summary": session.renderer().summary(session.state()),
        "isError": false
    })
}

fn conversion_result(session: &WeConvert, value: f64, from: &str, to: &str, converted: f64) -> JsonValue {
    let text = session.renderer().format_conversion(value, from, converted, to);
    json!({
        "content": [{ "type": "text", "text": text }],
        "value": converted,
        "from_unit": from,
        "to_unit": to,
        "isError": false
    })
}

fn error_result(e: &ConvertError) -> JsonValue {
    let report = ErrorReport::from(e);
    json!({
        "content": [{ "type": "text", "text": report.to_string() }],
        "error": report,
        "isError": true
    })
}

fn str_arg<'a>(args: &'a JsonValue, name: &str) -> Result<&'a str, McpError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

fn required_arg<'a>(args: &'a JsonValue, name: &str) -> Result<&'a JsonValue, McpError> {
    args.get(name)
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

/// Read a JSON number or numeric text as a finite value
fn number(value: &JsonValue) -> Result<f64, ConvertError> {
    match value {
        JsonValue::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConvertError::InvalidValue(n.to_string())),
        JsonValue::String(s) => parse_amount(s),
        other => Err(ConvertError::InvalidValue(other.to_string())),
    }
}

/// Check `unit` against the optional `category` restriction
fn restrict(category: Option<Category>, unit: UnitId) -> Result<UnitId, ConvertError> {
    match category {
        Some(category) if unit.category() != category => {
            Err(ConvertError::invalid_selection(category.name(), unit.name()))
        }
        _ => Ok(unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> WeConvert {
        WeConvert::default()
    }

    #[test]
    fn test_list_names_every_tool() {
        let tools = list();
        let names: Vec<&str> = tools["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        let mut session = session();
        for name in names {
            // every listed tool dispatches (argument errors are fine)
            let result = call(&mut session, name, &json!({}));
            if let Err(e) = result {
                assert_eq!(e.code, McpError::INVALID_PARAMS);
                assert!(e.message.starts_with("Missing"), "{}: {}", name, e.message);
            }
        }
    }

    #[test]
    fn test_unknown_tool() {
        let err = call(&mut session(), "eval", &json!({})).unwrap_err();
        assert_eq!(err.message, "Unknown tool: eval");
    }

    #[test]
    fn test_list_categories() {
        let result = call(&mut session(), "list_categories", &json!({})).unwrap();
        let categories = result["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 4);
        assert_eq!(categories[1]["name"], "Length");
        assert_eq!(categories[1]["base_unit"], "Meter");
        assert_eq!(categories[3]["units"][4], "Gallon");
    }

    #[test]
    fn test_list_units() {
        let result = call(&mut session(), "list_units", &json!({"category": "time"})).unwrap();
        assert_eq!(result["units"][1]["name"], "Minute");
        assert_eq!(result["units"][1]["symbol"], "min");

        let result = call(&mut session(), "list_units", &json!({"category": "Mass"})).unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "UNKNOWN_CATEGORY");
    }

    #[test]
    fn test_output_units() {
        let args = json!({"category": "Length", "input_unit": "Feet"});
        let result = call(&mut session(), "output_units", &args).unwrap();
        assert_eq!(result["units"], json!(["Meter", "KiloMeter", "Yard", "Mile"]));
    }

    #[test]
    fn test_convert() {
        let args = json!({"value": 1, "from_unit": "Gallon", "to_unit": "mL"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["value"], 3785.41);
        assert_eq!(result["to_unit"], "Milliliter");
        assert_eq!(result["content"][0]["text"], "1 Gallon = 3785.41 Milliliter");
    }

    #[test]
    fn test_convert_text_value() {
        let args = json!({"value": "60", "from_unit": "min", "to_unit": "s"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["value"], 3600.0);
    }

    #[test]
    fn test_convert_errors() {
        let args = json!({"value": 1, "from_unit": "Celsius", "to_unit": "Meter"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["error"]["code"], "INCOMPATIBLE");

        let args = json!({"value": 1, "from_unit": "Celsius", "to_unit": "Meter", "category": "Length"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["error"]["code"], "INVALID_SELECTION");

        let args = json!({"value": "abc", "from_unit": "m", "to_unit": "ft"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["error"]["code"], "INVALID_VALUE");
    }

    #[test]
    fn test_convert_quantity() {
        let args = json!({"quantity": "1e-3 km", "to_unit": "m"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["value"], 1.0);
        assert_eq!(result["from_unit"], "KiloMeter");

        let args = json!({"quantity": "1.5e+2 m", "to_unit": "KiloMeter", "category": "Length"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["value"], 0.15);
        assert_eq!(result["content"][0]["text"], "150 Meter = 0.15 KiloMeter");
    }

    #[test]
    fn test_convert_quantity_errors() {
        let args = json!({"quantity": "5 km", "to_unit": "s"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["error"]["code"], "INCOMPATIBLE");

        let args = json!({"quantity": "5 km", "to_unit": "Celsius", "category": "Temperature"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["error"]["code"], "INVALID_SELECTION");

        let args = json!({"quantity": "km", "to_unit": "m"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["error"]["code"], "PARSE_ERROR");
    }

    #[test]
    fn test_convert_rejects_overflow() {
        let args = json!({"value": 1e308, "from_unit": "gal", "to_unit": "mL"});
        let result = call(&mut session(), "convert", &args).unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INVALID_VALUE");
        assert!(result.get("value").is_none());

        let args = json!({"value": "1e308", "conversion": "C->F"});
        let result = call(&mut session(), "in_units", &args).unwrap();
        assert_eq!(result["error"]["code"], "INVALID_VALUE");
    }

    #[test]
    fn test_missing_arguments_are_invalid_params() {
        let mut session = session();
        let cases = [
            ("select_category", "Missing category argument"),
            ("set_value", "Missing value argument"),
            ("list_units", "Missing category argument"),
            ("in_units", "Missing value argument"),
            ("convert", "Missing to_unit argument"),
        ];
        for (tool, message) in cases {
            let err = call(&mut session, tool, &json!({})).unwrap_err();
            assert_eq!(err.code, McpError::INVALID_PARAMS);
            assert_eq!(err.message, message);
        }

        let err = call(&mut session, "convert", &json!({"to_unit": "m", "value": 1})).unwrap_err();
        assert_eq!(err.message, "Missing from_unit argument");
    }

    #[test]
    fn test_in_units() {
        let args = json!({"value": 0, "conversion": "C->F"});
        let result = call(&mut session(), "in_units", &args).unwrap();
        assert_eq!(result["value"], 32.0);

        let args = json!({"value": 1, "conversion": "km mi"});
        let result = call(&mut session(), "in_units", &args).unwrap();
        assert_eq!(result["error"]["code"], "PARSE_ERROR");
    }

    #[test]
    fn test_form_flow() {
        let mut session = session();

        let result = call(&mut session, "select_category", &json!({"category": "Length"})).unwrap();
        assert_eq!(result["form"]["input_unit"], "Meter");
        assert_eq!(result["form"]["output_unit"], "KiloMeter");

        call(&mut session, "select_input_unit", &json!({"unit": "KiloMeter"})).unwrap();
        call(&mut session, "select_output_unit", &json!({"unit": "Meter"})).unwrap();
        let result = call(&mut session, "set_value", &json!({"value": 1})).unwrap();
        assert_eq!(result["form"]["output_value"], 1000.0);
        assert_eq!(result["summary"], "1 KiloMeter = 1000 Meter");
        assert!(result["content"][0]["text"].as_str().unwrap().ends_with("1000\n"));
    }

    #[test]
    fn test_form_rejects_foreign_unit() {
        let mut session = session();
        let result = call(&mut session, "select_input_unit", &json!({"unit": "Mile"})).unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INVALID_SELECTION");
        assert_eq!(result["form"]["input_unit"], "Celsius");
    }

    #[test]
    fn test_form_rejects_bad_value() {
        let mut session = session();
        let result = call(&mut session, "set_value", &json!({"value": "NaN"})).unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["form"]["input_value"], 0.0);
    }

    #[test]
    fn test_form_rejects_overflow() {
        let mut session = session();
        call(&mut session, "select_category", &json!({"category": "Volume"})).unwrap();
        call(&mut session, "select_input_unit", &json!({"unit": "Gallon"})).unwrap();
        call(&mut session, "select_output_unit", &json!({"unit": "Milliliter"})).unwrap();

        let result = call(&mut session, "set_value", &json!({"value": 1e308})).unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INVALID_VALUE");
        assert_eq!(result["form"]["input_value"], 0.0);
        assert_eq!(result["form"]["output_value"], 0.0);
    }

    #[test]
    fn test_sigfigs_session() {
        let settings = weconvert::Settings {
            number_format: weconvert::NumberFormat::SigFigs(3),
            ..weconvert::Settings::default()
        };
        let mut session = WeConvert::new(&settings);
        let args = json!({"value": 1, "from_unit": "mi", "to_unit": "ft"});
        let result = call(&mut session, "convert", &args).unwrap();
        assert_eq!(result["content"][0]["text"], "1.00 Mile = 5280 Feet");
    }
}
