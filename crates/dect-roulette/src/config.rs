//! Configuration for the roulette service.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Registry storage configuration
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Admin endpoint configuration
    #[serde(default)]
    pub admin: AdminConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Path to the JSON snapshot file
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,

    /// Enable persistence (if false, registry is in-memory only)
    #[serde(default = "default_true")]
    pub persist: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Path to the admin token file, created on first start
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Apply the global limiter to the public routes
    #[serde(default)]
    pub enabled: bool,

    /// Global requests per minute
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
            persist: true,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            global_per_minute: default_global_rpm(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_registry_path() -> PathBuf {
    PathBuf::from("data_file.json")
}

fn default_token_path() -> PathBuf {
    PathBuf::from("admintoken.secret")
}

fn default_true() -> bool {
    true
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

fn default_global_rpm() -> u32 {
    600
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_source() {
        let config: Config = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.listen_addr, "0.0.0.0");
        assert_eq!(config.registry.path, PathBuf::from("data_file.json"));
        assert!(config.registry.persist);
        assert_eq!(config.admin.token_path, PathBuf::from("admintoken.secret"));
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.rate_limit.global_per_minute, 600);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_overrides() {
        let config: Config = config::Config::builder()
            .set_override("server.port", 8080)
            .unwrap()
            .set_override("registry.persist", false)
            .unwrap()
            .set_override("registry.path", "/data/roulette.json")
            .unwrap()
            .set_override("rate_limit.enabled", true)
            .unwrap()
            .set_override("rate_limit.global_per_minute", 120)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(!config.registry.persist);
        assert_eq!(config.registry.path, PathBuf::from("/data/roulette.json"));
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.global_per_minute, 120);
    }

    #[test]
    fn test_default_matches_empty_source() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert!(config.registry.persist);
        assert!(!config.rate_limit.enabled);
    }
}
