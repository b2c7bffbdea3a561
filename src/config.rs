//! Application configuration
//!
//! Configuration is read once at process start: an optional TOML file
//! (default `config.toml`, overridable via `CONFIG_PATH`) merged with
//! environment variable overrides. Nothing here is hot-reloaded; changing
//! a limit means editing the configuration and restarting the server.
//!
//! Configuration problems are logged but do not prevent startup - a
//! missing or malformed file falls back to the defaults.

use serde::Deserialize;

/// Maximum lengths for user-supplied fields, in characters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum username length.
    pub username: usize,
    /// Maximum thread title length.
    pub thread_title: usize,
    /// Maximum post content length.
    pub post_content: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            username: 50,
            thread_title: 200,
            post_content: 1000,
        }
    }
}

/// Process-wide settings, fixed for the lifetime of the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Lowers the default log filter to `debug`.
    pub debug: bool,
    /// SQLite database URL.
    pub database_url: String,
    /// Field length limits enforced by validation.
    pub limits: Limits,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
            database_url: "sqlite://data/threadboard.db".to_string(),
            limits: Limits::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the TOML file (if present), then apply
    /// environment overrides (`SERVER_HOST`, `SERVER_PORT`,
    /// `DATABASE_URL`).
    pub fn load() -> Self {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut config = Self::from_file(&path);
        config.apply_env_overrides();
        config
    }

    /// Parse a TOML document into a config; absent keys keep defaults.
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn from_file(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match Self::from_toml(&raw) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("could not parse config file '{}', using defaults: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("config file '{}' not found, using defaults", path);
                Self::default()
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("ignoring invalid SERVER_PORT '{}'", port),
            }
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert!(!config.debug);
        assert_eq!(config.limits.username, 50);
        assert_eq!(config.limits.thread_title, 200);
        assert_eq!(config.limits.post_content, 1000);
    }

    #[test]
    fn test_from_toml_full() {
        let config = AppConfig::from_toml(
            r#"
            host = "127.0.0.1"
            port = 8080
            debug = true
            database_url = "sqlite://test.db"

            [limits]
            username = 10
            thread_title = 20
            post_content = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.debug);
        assert_eq!(config.database_url, "sqlite://test.db");
        assert_eq!(
            config.limits,
            Limits {
                username: 10,
                thread_title: 20,
                post_content: 30,
            }
        );
    }

    #[test]
    fn test_from_toml_partial_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            port = 9999

            [limits]
            post_content = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.limits.post_content, 5);
        assert_eq!(config.limits.username, 50);
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(AppConfig::from_toml("port = \"not a number\"").is_err());
    }

    #[test]
    fn test_bind_addr() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }
}
