//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RECIPES_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `RECIPES_HOST` - Bind address (default: 127.0.0.1)
//! - `RECIPES_PORT` - Listen port (default: 3400)
//! - `RECIPES_BASE_URL` - Public URL, used as the CORS origin (default: `http://localhost:3400`)
//! - `RECIPES_IN_PRODUCTION` - Marks session cookies `Secure` (default: false)
//! - `RECIPES_USE_TEMPLATE_CACHE` - Reuse one template cache for every render
//!   (default: same as `RECIPES_IN_PRODUCTION`)
//! - `RECIPES_DB_MAX_CONNECTIONS` - Connection pool size (default: 10)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3400;
const DEFAULT_BASE_URL: &str = "http://localhost:3400";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
///
/// Built once in `main` and handed to [`crate::state::AppState`]; nothing reads
/// the environment after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// Production mode (secure cookies)
    pub in_production: bool,
    /// Build the template cache once instead of on every render
    pub use_template_cache: bool,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
}

impl Default for AppConfig {
    /// Local development settings.
    fn default() -> Self {
        Self {
            database_url: SecretString::from("postgres://localhost/recipe_box"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_owned(),
            in_production: false,
            use_template_cache: false,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("RECIPES_DATABASE_URL")?;
        let host = get_env_or_default("RECIPES_HOST", DEFAULT_HOST)
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("RECIPES_HOST".to_string(), e.to_string()))?;
        let port = match get_optional_env("RECIPES_PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnvVar("RECIPES_PORT".to_string(), e.to_string())
            })?,
            None => DEFAULT_PORT,
        };
        let base_url = get_env_or_default("RECIPES_BASE_URL", DEFAULT_BASE_URL);
        let in_production = get_bool_env("RECIPES_IN_PRODUCTION")?.unwrap_or(false);
        let use_template_cache =
            get_bool_env("RECIPES_USE_TEMPLATE_CACHE")?.unwrap_or(in_production);
        let db_max_connections = match get_optional_env("RECIPES_DB_MAX_CONNECTIONS") {
            Some(value) => value.parse::<u32>().map_err(|e| {
                ConfigError::InvalidEnvVar("RECIPES_DB_MAX_CONNECTIONS".to_string(), e.to_string())
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            in_production,
            use_template_cache,
            db_max_connections,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an optional boolean environment variable.
fn get_bool_env(key: &str) -> Result<Option<bool>, ConfigError> {
    get_optional_env(key)
        .map(|value| {
            parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidEnvVar(key.to_string(), format!("not a boolean: {value}"))
            })
        })
        .transpose()
}

/// Parse the boolean spellings accepted in `.env` files.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool(" 1 "), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(""), Some(false));
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn test_default_is_development() {
        let config = AppConfig::default();
        assert!(!config.in_production);
        assert!(!config.use_template_cache);
        assert_eq!(config.port, 3400);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            ..AppConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = AppConfig {
            database_url: SecretString::from("postgres://cook:hunter2@db/recipes"),
            ..AppConfig::default()
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:3400"));
        assert!(!debug_output.contains("hunter2"));
    }
}
