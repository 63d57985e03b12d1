//! Application configuration loaded from environment variables.

use projections::ProjectorConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `PROJECTOR_ENFORCE_SEQUENCE` — skip redelivered and reject out-of-order
///   events (default: `true`)
/// - `SUBSCRIPTION_BUFFER` — updates buffered per watched order (default: `64`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub enforce_sequence: bool,
    pub subscription_buffer: usize,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            enforce_sequence: lookup("PROJECTOR_ENFORCE_SEQUENCE")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.enforce_sequence),
            subscription_buffer: lookup("SUBSCRIPTION_BUFFER")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.subscription_buffer),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn projector(&self) -> ProjectorConfig {
        ProjectorConfig {
            enforce_sequence: self.enforce_sequence,
            ..ProjectorConfig::default()
        }
        .with_subscription_buffer(self.subscription_buffer)
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
            port: 3000,
            log_level: "info".to_string(),
            enforce_sequence: true,
            subscription_buffer: ProjectorConfig::DEFAULT_SUBSCRIPTION_BUFFER,
        }
    }
}
