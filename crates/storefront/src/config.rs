//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_NAME` - Store name shown in the header (default: Tienda)
//! - `STOREFRONT_CATALOG` - Catalog file path or http(s) URL
//!   (default: crates/storefront/data/products.json)
//! - `CHECKOUT_DELAY_MS` - Simulated payment latency (default: 2000)
//! - `CHECKOUT_SUCCESS_RATE` - Approval probability in [0, 1] (default: 0.8)
//! - `CHECKOUT_SEED` - Seed for reproducible payment outcomes
//! - `NOTIFICATION_VISIBLE_MS` - How long a notice stays up (default: 1500)
//! - `NOTIFICATION_FADE_MS` - Notice fade-out duration (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::CatalogSource;

pub const DEFAULT_CATALOG: &str = "crates/storefront/data/products.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Store name shown in page titles and the header
    pub store_name: String,
    /// Where the product catalog is read from
    pub catalog: CatalogSource,
    pub checkout: CheckoutConfig,
    pub notifications: NotificationConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

/// Simulated payment gateway settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutConfig {
    /// Latency before an outcome is drawn
    pub delay: Duration,
    /// Probability that a payment is approved
    pub success_rate: f64,
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(2000),
            success_rate: 0.8,
            seed: None,
        }
    }
}

/// Notification display timing, handed to the page script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationConfig {
    pub visible: Duration,
    pub fade: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            visible: Duration::from_millis(1500),
            fade: Duration::from_millis(300),
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
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or
    /// if the success rate falls outside [0, 1].
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        Ok(Self {
            host: vars.parse_or("STOREFRONT_HOST", "127.0.0.1")?,
            port: vars.parse_or("STOREFRONT_PORT", "3000")?,
            base_url: vars.or_default("STOREFRONT_BASE_URL", "http://localhost:3000"),
            store_name: vars.or_default("STOREFRONT_NAME", "Tienda"),
            catalog: vars.parse_or("STOREFRONT_CATALOG", DEFAULT_CATALOG)?,
            checkout: CheckoutConfig::from_vars(&vars)?,
            notifications: NotificationConfig {
                visible: Duration::from_millis(vars.parse_or("NOTIFICATION_VISIBLE_MS", "1500")?),
                fade: Duration::from_millis(vars.parse_or("NOTIFICATION_FADE_MS", "300")?),
            },
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CheckoutConfig {
    fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let success_rate: f64 = vars.parse_or("CHECKOUT_SUCCESS_RATE", "0.8")?;
        if !(0.0..=1.0).contains(&success_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "CHECKOUT_SUCCESS_RATE".to_string(),
                format!("must be between 0 and 1 (got {success_rate})"),
            ));
        }

        let seed = vars
            .optional("CHECKOUT_SEED")
            .map(|raw| {
                raw.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("CHECKOUT_SEED".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            delay: Duration::from_millis(vars.parse_or("CHECKOUT_DELAY_MS", "2000")?),
            success_rate,
            seed,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.store_name, "Tienda");
        assert_eq!(config.checkout, CheckoutConfig::default());
        assert_eq!(config.notifications, NotificationConfig::default());
        assert!(matches!(config.catalog, CatalogSource::File(_)));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = config_with(&[("STOREFRONT_HOST", "0.0.0.0"), ("STOREFRONT_PORT", "8080")]).unwrap();

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_with(&[("STOREFRONT_PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_PORT"));
    }

    #[test]
    fn test_checkout_settings() {
        let config = config_with(&[
            ("CHECKOUT_DELAY_MS", "0"),
            ("CHECKOUT_SUCCESS_RATE", "1"),
            ("CHECKOUT_SEED", "42"),
        ])
        .unwrap();

        assert_eq!(config.checkout.delay, Duration::ZERO);
        assert!((config.checkout.success_rate - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.checkout.seed, Some(42));
    }

    #[test]
    fn test_success_rate_out_of_range() {
        assert!(config_with(&[("CHECKOUT_SUCCESS_RATE", "1.5")]).is_err());
        assert!(config_with(&[("CHECKOUT_SUCCESS_RATE", "-0.1")]).is_err());
    }

    #[test]
    fn test_remote_catalog() {
        let config = config_with(&[("STOREFRONT_CATALOG", "https://example.com/products.json")]).unwrap();
        assert!(matches!(config.catalog, CatalogSource::Url(_)));
    }

    #[test]
    fn test_blank_value_uses_default() {
        let config = config_with(&[("STOREFRONT_NAME", "  ")]).unwrap();
        assert_eq!(config.store_name, "Tienda");
    }
}
