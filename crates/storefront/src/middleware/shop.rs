//! Per-request shop state.
//!
//! [`ShopSession`] restores a [`Shop`] from the browser session, lets the
//! handler apply intents, and writes back only the keys that changed when
//! the handler calls [`ShopSession::commit`].

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::models::Notification;
use crate::services::{Changes, Intent, Shop, ShopError, Transition};
use crate::storage::{MemoryStore, keys};

/// Session key holding notifications waiting to be shown.
pub const NOTICES_KEY: &str = "notices";

/// Extractor giving a handler the shopper's [`Shop`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut shop: ShopSession, State(state): State<AppState>) -> Result<Redirect> {
///     let transition = shop.apply(state.catalog(), Intent::AddToCart(id));
///     shop.commit().await?;
///     Ok(Redirect::to("/"))
/// }
/// ```
pub struct ShopSession {
    session: Session,
    store: MemoryStore,
    shop: Shop,
    pending: Changes,
    notices: Vec<Notification>,
}

impl<S> FromRequestParts<S> for ShopSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let mut store = MemoryStore::new();
        for key in keys::ALL {
            if let Some(value) = session.get::<String>(key).await? {
                store.preload(key, value);
            }
        }
        let shop = Shop::restore(&store);

        Ok(Self {
            session,
            store,
            shop,
            pending: Changes::NONE,
            notices: Vec::new(),
        })
    }
}

impl ShopSession {
    #[must_use]
    pub const fn shop(&self) -> &Shop {
        &self.shop
    }

    /// Apply an intent. Notifications from the outcome, success or error,
    /// are queued for the next page.
    ///
    /// # Errors
    ///
    /// Returns the `ShopError` that rejected the intent.
    pub fn apply(&mut self, catalog: &Catalog, intent: Intent) -> Result<Transition, ShopError> {
        match self.shop.apply(catalog, intent) {
            Ok(transition) => {
                self.pending = self.pending.merge(transition.changes);
                self.notices.extend(transition.notices.iter().cloned());
                Ok(transition)
            }
            Err(e) => {
                tracing::info!(error = %e, "Intent rejected");
                self.notices.push(e.notification());
                Err(e)
            }
        }
    }

    /// Persist changed keys and queued notifications to the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if serialization or the session store fails.
    pub async fn commit(mut self) -> Result<(), AppError> {
        self.shop.save_changes(&mut self.store, self.pending)?;

        for (key, value) in self.store.take_dirty() {
            match value {
                Some(value) => self.session.insert(&key, value).await?,
                None => {
                    self.session.remove_value(&key).await?;
                }
            }
        }

        if !self.notices.is_empty() {
            let mut queued: Vec<Notification> =
                self.session.get(NOTICES_KEY).await?.unwrap_or_default();
            queued.append(&mut self.notices);
            self.session.insert(NOTICES_KEY, queued).await?;
        }

        Ok(())
    }

    /// Take the notifications queued by earlier requests, plus any queued
    /// on this one.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the session store fails.
    pub async fn take_notices(&mut self) -> Result<Vec<Notification>, AppError> {
        let mut notices: Vec<Notification> = self
            .session
            .remove(NOTICES_KEY)
            .await?
            .unwrap_or_default();
        notices.append(&mut self.notices);
        Ok(notices)
    }
}
