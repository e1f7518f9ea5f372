//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `SNAPSHOT_PATH` — bulk-export JSON file loaded at startup (default: none, start empty)
/// - `EVENT_BUFFER` — in-memory event channel capacity (default: `1024`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub snapshot_path: Option<PathBuf>,
    pub event_buffer: usize,
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
            snapshot_path: lookup("SNAPSHOT_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            event_buffer: lookup("EVENT_BUFFER")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.event_buffer),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            snapshot_path: None,
            event_buffer: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert!(config.snapshot_path.is_none());
        assert_eq!(config.event_buffer, 1024);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[
            ("PORT", "9090"),
            ("SNAPSHOT_PATH", "/var/lib/feed/export.json"),
            ("EVENT_BUFFER", "16"),
        ]);
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.snapshot_path,
            Some(PathBuf::from("/var/lib/feed/export.json"))
        );
        assert_eq!(config.event_buffer, 16);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config_from(&[("PORT", "http"), ("EVENT_BUFFER", "0"), ("SNAPSHOT_PATH", "")]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.event_buffer, 1024);
        assert!(config.snapshot_path.is_none());
    }
}
