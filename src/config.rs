//! Server configuration from environment variables

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::robot::store::DEFAULT_ROBOT_FILE;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// HTTP server settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JSON file holding saved robots
    pub robot_store: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            robot_store: PathBuf::from(DEFAULT_ROBOT_FILE),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `ROBOT_STORE`, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    ///
    /// An unparsable port falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            robot_store: lookup("ROBOT_STORE")
                .map(PathBuf::from)
                .unwrap_or(defaults.robot_store),
        }
    }

    /// Address to bind, `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log filter from `RUST_LOG`, or `default_directive` when unset or unparsable
pub fn log_filter(default_directive: &str) -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok(), default_directive)
}

fn filter_from(directives: Option<String>, default_directive: &str) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("ROBOT_STORE", "/var/lib/keiba/robots.json"),
        ]));
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.robot_store, PathBuf::from("/var/lib/keiba/robots.json"));
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "http")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_log_filter_prefers_env_directives() {
        let filter = filter_from(Some("keiba=debug".to_string()), "warn");
        assert!(filter.to_string().contains("keiba=debug"));

        let filter = filter_from(None, "warn");
        assert!(filter.to_string().contains("warn"));
    }
}
