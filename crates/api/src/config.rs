//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Order service configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `8001`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `PRODUCT_SERVICE_URL`: product service base URL (default: `"http://localhost:8000"`)
/// - `CATALOG_TIMEOUT_MS`: per-request catalog timeout (default: `5000`)
/// - `RESTOCK_ON_CANCEL`: return cancelled units to the catalog (default: `false`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub product_service_url: String,
    pub catalog_timeout: Duration,
    pub restock_on_cancel: bool,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            product_service_url: lookup("PRODUCT_SERVICE_URL")
                .unwrap_or(defaults.product_service_url),
            catalog_timeout: lookup("CATALOG_TIMEOUT_MS")
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.catalog_timeout),
            restock_on_cancel: lookup("RESTOCK_ON_CANCEL")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.restock_on_cancel),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            log_level: "info".to_string(),
            product_service_url: "http://localhost:8000".to_string(),
            catalog_timeout: Duration::from_millis(5000),
            restock_on_cancel: false,
        }
    }
}
