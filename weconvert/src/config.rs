//! Runtime settings read from the environment
//!
//! - `WECONVERT_LOG`: log filter, falls back to `RUST_LOG`, then "info"
//! - `WECONVERT_DECIMALS`: decimal places shown for values (default 6)
//! - `WECONVERT_FORMAT`: "decimal:N" or "sigfigs:N"; wins over
//!   `WECONVERT_DECIMALS` when both are set
//! - `WECONVERT_CATEGORY`: category the form opens on (default Temperature)

use std::env;
use tracing::warn;
use weconvert_units::Category;
use crate::render::NumberFormat;

const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_DECIMALS: u32 = 6;
const MAX_DECIMALS: u32 = 15;
const MAX_SIGFIGS: u32 = 17;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_filter: String,
    pub number_format: NumberFormat,
    pub initial_category: Category,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            number_format: NumberFormat::Decimal(DEFAULT_DECIMALS),
            initial_category: Category::default(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`; invalid values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let log_filter = lookup("WECONVERT_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        let decimals = match lookup("WECONVERT_DECIMALS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(places) if places <= MAX_DECIMALS => NumberFormat::Decimal(places),
                _ => {
                    warn!(value = %raw, "ignoring invalid WECONVERT_DECIMALS");
                    defaults.number_format
                }
            },
            None => defaults.number_format,
        };

        let number_format = match lookup("WECONVERT_FORMAT") {
            Some(raw) => parse_number_format(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "ignoring invalid WECONVERT_FORMAT");
                decimals
            }),
            None => decimals,
        };

        let initial_category = match lookup("WECONVERT_CATEGORY") {
            Some(raw) => Category::from_name(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "ignoring invalid WECONVERT_CATEGORY");
                defaults.initial_category
            }),
            None => defaults.initial_category,
        };

        Settings {
            log_filter,
            number_format,
            initial_category,
        }
    }
}

/// Parse "decimal:N" or "sigfigs:N" (kind ignores case)
fn parse_number_format(raw: &str) -> Option<NumberFormat> {
    let (kind, n) = raw.trim().split_once(':')?;
    let n: u32 = n.trim().parse().ok()?;
    match kind.trim().to_ascii_lowercase().as_str() {
        "decimal" if n <= MAX_DECIMALS => Some(NumberFormat::Decimal(n)),
        "sigfigs" if (1..=MAX_SIGFIGS).contains(&n) => Some(NumberFormat::SigFigs(n)),
        _ => None,
    }
}
