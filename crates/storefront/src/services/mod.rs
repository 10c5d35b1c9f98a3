//! Business logic for the storefront.
//!
//! # Services
//!
//! - `auth` - Simulated registration and login against the local registry
//! - `checkout` - Checkout state machine and the simulated payment gateway
//! - `shop` - The controller that applies shopper intents to shop state

pub mod auth;
pub mod checkout;
pub mod shop;

pub use shop::{Changes, Effect, Intent, Screen, Shop, ShopError, Transition};
