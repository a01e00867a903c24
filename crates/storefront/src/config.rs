//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOOKHUB_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`). Only required by commands that touch the database.
//! - `BOOKHUB_DATA_DIR` - Directory holding cart, wishlist and session files
//!   (default: `.bookhub`)
//! - `BOOKHUB_CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `BOOKHUB_CATALOG_CACHE_CAPACITY` - Catalog cache entries (default: 1000)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DATABASE_URL_VAR: &str = "BOOKHUB_DATABASE_URL";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Directory for the file-backed collection store
    pub data_dir: PathBuf,
    /// Catalog cache settings
    pub catalog_cache: CatalogCacheConfig,
}

/// Catalog cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCacheConfig {
    pub ttl: Duration,
    pub capacity: u64,
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            capacity: 1000,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup(DATABASE_URL_VAR)
            .or_else(|| lookup("DATABASE_URL"))
            .map(SecretString::from);
        let data_dir = PathBuf::from(
            lookup("BOOKHUB_DATA_DIR").unwrap_or_else(|| ".bookhub".to_owned()),
        );

        let defaults = CatalogCacheConfig::default();
        let ttl = parse_or(&lookup, "BOOKHUB_CATALOG_CACHE_TTL_SECS", defaults.ttl.as_secs())?;
        let capacity = parse_or(&lookup, "BOOKHUB_CATALOG_CACHE_CAPACITY", defaults.capacity)?;

        Ok(Self {
            database_url,
            data_dir,
            catalog_cache: CatalogCacheConfig {
                ttl: Duration::from_secs(ttl),
                capacity,
            },
        })
    }

    /// The database URL, for commands that cannot run without one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no database URL is configured.
    pub fn require_database_url(&self) -> Result<&SecretString, ConfigError> {
        self.database_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar(DATABASE_URL_VAR.to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.data_dir, PathBuf::from(".bookhub"));
        assert_eq!(config.catalog_cache, CatalogCacheConfig::default());
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://fallback")]).unwrap();
        assert_eq!(
            config.require_database_url().unwrap().expose_secret(),
            "postgres://fallback"
        );

        let config = load(&[
            ("DATABASE_URL", "postgres://fallback"),
            ("BOOKHUB_DATABASE_URL", "postgres://primary"),
        ])
        .unwrap();
        assert_eq!(
            config.require_database_url().unwrap().expose_secret(),
            "postgres://primary"
        );
    }

    #[test]
    fn test_missing_database_url() {
        let config = load(&[]).unwrap();
        assert!(matches!(
            config.require_database_url(),
            Err(ConfigError::MissingEnvVar(var)) if var == "BOOKHUB_DATABASE_URL"
        ));
    }

    #[test]
    fn test_cache_settings() {
        let config = load(&[
            ("BOOKHUB_CATALOG_CACHE_TTL_SECS", "60"),
            ("BOOKHUB_CATALOG_CACHE_CAPACITY", "50"),
        ])
        .unwrap();
        assert_eq!(config.catalog_cache.ttl, Duration::from_secs(60));
        assert_eq!(config.catalog_cache.capacity, 50);
    }

    #[test]
    fn test_invalid_number() {
        let err = load(&[("BOOKHUB_CATALOG_CACHE_TTL_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(var, _) if var == "BOOKHUB_CATALOG_CACHE_TTL_SECS"));
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("BOOKHUB_DATABASE_URL", "postgres://user:hunter2@db")]).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
