//! Command implementations.
//!
//! Every shop command opens the profile, applies one or more intents to the
//! shop controller and writes the touched keys back before returning.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod simulate;

use std::path::PathBuf;

use thiserror::Error;

use tienda_storefront::catalog::{Catalog, CatalogSource, LoadError};
use tienda_storefront::models::{Notification, NotificationLevel};
use tienda_storefront::services::{Intent, Shop, ShopError, Transition};
use tienda_storefront::storage::{FileStore, StorageError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Catalog could not be loaded.
    #[error("Failed to load catalog from {source_name}: {error}")]
    Catalog {
        source_name: String,
        #[source]
        error: LoadError,
    },

    /// Profile could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The shop rejected the action.
    #[error("{}", .0.user_message())]
    Rejected(#[from] ShopError),

    /// Checkout needs a signed-in shopper.
    #[error("Sign in with `tienda auth login` or `tienda auth register` first")]
    SignInRequired,

    /// Reading from the terminal failed.
    #[error("Failed to read answer: {0}")]
    Prompt(#[from] std::io::Error),

    /// Simulator rate out of range.
    #[error("Invalid rate: {0}. Must be between 0 and 1")]
    InvalidRate(f64),
}

/// Load the catalog or fail the command.
///
/// # Errors
///
/// Returns `CommandError::Catalog` if the source cannot be read or parsed.
pub async fn load_catalog(source: &CatalogSource) -> Result<Catalog, CommandError> {
    let client = reqwest::Client::new();
    Catalog::load(source, &client)
        .await
        .map_err(|error| CommandError::Catalog {
            source_name: source.to_string(),
            error,
        })
}

/// The shopper's state as stored in a profile file.
pub struct Profile {
    catalog: Catalog,
    store: FileStore,
    shop: Shop,
}

impl Profile {
    /// Load the catalog and restore the shop from the profile at `path`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Catalog` if the catalog cannot be loaded.
    pub async fn open(source: &CatalogSource, path: PathBuf) -> Result<Self, CommandError> {
        let catalog = load_catalog(source).await?;
        let store = FileStore::open(path);
        let shop = Shop::restore(&store);
        tracing::debug!(profile = %store.path().display(), "Profile opened");

        Ok(Self {
            catalog,
            store,
            shop,
        })
    }

    pub const fn shop(&self) -> &Shop {
        &self.shop
    }

    /// Apply an intent, save what it touched and print its notices.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Rejected` if the shop refuses the action, or
    /// `CommandError::Storage` if the profile cannot be written.
    pub fn apply(&mut self, intent: Intent) -> Result<Transition, CommandError> {
        let transition = self.shop.apply(&self.catalog, intent)?;
        self.shop.save_changes(&mut self.store, transition.changes)?;
        for notice in &transition.notices {
            report(notice);
        }
        Ok(transition)
    }
}

/// Print a notification at a log level matching its severity.
pub fn report(notice: &Notification) {
    match notice.level {
        NotificationLevel::Error => tracing::warn!("{}", notice.message),
        NotificationLevel::Info | NotificationLevel::Success => tracing::info!("{}", notice.message),
    }
}
