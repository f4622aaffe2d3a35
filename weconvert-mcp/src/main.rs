//! WeConvert MCP Server
//!
//! Line-delimited JSON-RPC over stdio. One conversion form lives for the
//! whole connection; the form tools edit it and return it re-rendered.
//!
//! Tools:
//! - list_categories, list_units, output_units: browse the unit sets
//! - convert, in_units: one-off conversions
//! - form, select_category, select_input_unit, select_output_unit,
//!   set_value: drive the conversion form

mod tools;

use std::io::{self, BufRead, Write};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use weconvert::{Settings, WeConvert};

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "weconvert";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    // always present; null when the request id could not be read
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub(crate) struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    pub(crate) const PARSE_ERROR: i32 = -32700;
    pub(crate) const METHOD_NOT_FOUND: i32 = -32601;
    pub(crate) const INVALID_PARAMS: i32 = -32602;

    pub(crate) fn invalid_params(message: impl Into<String>) -> Self {
        McpError {
            code: Self::INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }
}

fn init_logging(settings: &Settings) {
    // stdout carries the protocol, logs go to stderr
    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    let settings = Settings::from_env();
    init_logging(&settings);

    let mut session = WeConvert::new(&settings);

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "WeConvert MCP server started");
    info!(category = %settings.initial_category, "form ready");

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "received");

                let Some(response) = process_line(&mut session, line) else {
                    continue;
                };

                if let Err(e) = write_response(&response) {
                    error!(error = %e, "error writing response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("server shutting down");
}

fn write_response(response: &McpResponse) -> io::Result<()> {
    let response_json = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", response_json)?;
    stdout.flush()
}

/// Handle one input line; `None` for notifications, which get no response
fn process_line(session: &mut WeConvert, line: &str) -> Option<McpResponse> {
    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "error parsing request");
            return Some(McpResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(McpError {
                    code: McpError::PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                }),
            });
        }
    };

    debug!(method = %request.method, "processing");
    let response = handle_request(session, &request);

    if request.id.is_none() {
        debug!(method = %request.method, "notification processed (no response)");
        return None;
    }
    Some(response)
}

fn handle_request(session: &mut WeConvert, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => Ok(tools::list()),
        "tools/call" => handle_tool_call(session, &request.params),

        _ => Err(McpError {
            code: McpError::METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion for temperature, length, time and volume"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "WeConvert converts values between units of the same category (Temperature, Length, Time, Volume). Use 'convert' for one-off conversions, or the form tools to select a category, input and output unit and a value."
    }))
}

fn handle_tool_call(session: &mut WeConvert, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params
        .as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    tools::call(session, name, &args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> WeConvert {
        WeConvert::default()
    }

    #[test]
    fn test_parse_error() {
        let response = process_line(&mut session(), "{not json").unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], JsonValue::Null);
        assert!(json.as_object().unwrap().contains_key("id"));
        assert_eq!(json["error"]["code"], McpError::PARSE_ERROR);
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_notification_gets_no_response() {
        let line = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        assert!(process_line(&mut session(), line).is_none());
    }

    #[test]
    fn test_initialize() {
        let line = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18","clientInfo":{"name":"test"}}}"#;
        let response = process_line(&mut session(), line).unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-06-18");
        assert_eq!(result["serverInfo"]["name"], "weconvert");
        assert_eq!(response.id, Some(json!(1)));
    }

    #[test]
    fn test_unknown_method() {
        let line = r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#;
        let response = process_line(&mut session(), line).unwrap();
        assert_eq!(response.error.unwrap().code, McpError::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_tool_call_round_trip() {
        let mut session = session();
        let line = r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"convert","arguments":{"value":100,"from_unit":"Celsius","to_unit":"Fahrenheit"}}}"#;
        let response = process_line(&mut session, line).unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["isError"], false);
        assert!((result["value"].as_f64().unwrap() - 212.0).abs() < 1e-9);
    }

    #[test]
    fn test_tool_call_missing_name() {
        let line = r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{}}"#;
        let response = process_line(&mut session(), line).unwrap();
        assert_eq!(response.error.unwrap().code, McpError::INVALID_PARAMS);
    }

    #[test]
    fn test_response_serialization() {
        let line = r#"{"jsonrpc":"2.0","id":5,"method":"ping"}"#;
        let response = process_line(&mut session(), line).unwrap();
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"jsonrpc":"2.0","id":5,"result":{}}"#);
    }
}
