//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, LoadError};
use crate::config::StorefrontConfig;
use crate::services::checkout::PaymentSimulator;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog is read once at
/// startup and never changes afterwards.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    catalog_error: Option<String>,
    payments: PaymentSimulator,
}

impl AppState {
    /// Create a new application state.
    ///
    /// A catalog that failed to load leaves the storefront running with no
    /// products; the error is kept for display and readiness checks.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Result<Catalog, LoadError>) -> Self {
        let (catalog, catalog_error) = match catalog {
            Ok(catalog) => (catalog, None),
            Err(e) => (Catalog::default(), Some(e.to_string())),
        };
        let payments = PaymentSimulator::new(&config.checkout);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                catalog_error,
                payments,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Why the catalog is empty, if loading failed.
    #[must_use]
    pub fn catalog_error(&self) -> Option<&str> {
        self.inner.catalog_error.as_deref()
    }

    /// The shared payment gateway.
    #[must_use]
    pub fn payments(&self) -> &PaymentSimulator {
        &self.inner.payments
    }
}
