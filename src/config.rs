//! Configuration module for the CineHub backend.
//!
//! Loads configuration from `config.toml` with environment variable overrides.

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub qq: QqConfig,
}

/// Server configuration
#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub jwt_secret: Option<String>,
}

// Custom Debug implementation to avoid exposing jwt_secret
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "jwt_secret",
                &self.jwt_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            jwt_secret: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Verification code and session settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Verification code lifetime in seconds.
    #[serde(default = "default_code_ttl")]
    pub code_ttl_secs: u64,
    /// Wrong guesses allowed before a code is invalidated.
    #[serde(default = "default_code_max_attempts")]
    pub code_max_attempts: u32,
    /// Interval between sweeps of expired codes and OAuth states.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: default_code_ttl(),
            code_max_attempts: default_code_max_attempts(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

fn default_code_ttl() -> u64 {
    600
}

fn default_code_max_attempts() -> u32 {
    5
}

fn default_cleanup_interval() -> u64 {
    300
}

/// Frontend origin, used for CORS and share/redirect URLs
#[derive(Debug, Clone, Deserialize)]
pub struct FrontendConfig {
    #[serde(default = "default_frontend_url")]
    pub base_url: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            base_url: default_frontend_url(),
        }
    }
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

/// QQ OAuth configuration (demo stub; no real token exchange happens)
#[derive(Clone, Deserialize)]
pub struct QqConfig {
    #[serde(default = "default_qq_app_id")]
    pub app_id: String,
    #[serde(default = "default_qq_redirect_uri")]
    pub redirect_uri: String,
}

// Custom Debug implementation to avoid exposing app_id
impl std::fmt::Debug for QqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QqConfig")
            .field("app_id", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl Default for QqConfig {
    fn default() -> Self {
        Self {
            app_id: default_qq_app_id(),
            redirect_uri: default_qq_redirect_uri(),
        }
    }
}

fn default_qq_app_id() -> String {
    "your_qq_app_id".to_string()
}

fn default_qq_redirect_uri() -> String {
    "http://localhost:5000/api/auth/qq/callback".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `config.toml` in current directory (optional)
    /// 3. Environment variables with `CINEHUB_` prefix
    ///
    /// Environment variables use double underscore for nesting:
    /// - `CINEHUB_SERVER__PORT=9000` sets `server.port`
    /// - `CINEHUB_FRONTEND__BASE_URL=https://example.com` sets `frontend.base_url`
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file path.
    pub fn load_from(config_path: &str) -> Result<Self, AppError> {
        let config = ConfigLoader::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000_i64)?
            .set_default("auth.code_ttl_secs", 600_i64)?
            .set_default("auth.code_max_attempts", 5_i64)?
            .set_default("auth.cleanup_interval_secs", 300_i64)?
            .set_default("frontend.base_url", "http://localhost:5173")?
            // Add config file (optional)
            .add_source(File::with_name(config_path).required(false))
            // Override with environment variables
            // CINEHUB_SERVER__PORT=9000 -> server.port = 9000
            .add_source(
                Environment::with_prefix("CINEHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration for required fields.
    fn validate(&self) -> Result<(), AppError> {
        // JWT secret is required for tokens to survive restarts; a random
        // one is generated at startup when missing.
        if self.server.jwt_secret.is_none() {
            tracing::warn!("JWT secret not configured - tokens will not survive restarts");
        }

        Ok(())
    }

    /// Address string for the TCP listener.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            frontend: FrontendConfig::default(),
            qq: QqConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.code_ttl_secs, 600);
        assert_eq!(config.auth.code_max_attempts, 5);
        assert_eq!(config.frontend.base_url, "http://localhost:5173");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = Config::load_from("does-not-exist.toml").expect("load should succeed");
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.jwt_secret.is_none());
    }

    #[test]
    fn test_debug_redacts_jwt_secret() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            jwt_secret: Some("super-secret".to_string()),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
