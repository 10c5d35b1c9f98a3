//! Domain models for the storefront.
//!
//! - [`cart`] - Cart lines and the cart itself
//! - [`user`] - Registered shoppers
//! - [`session`] - Who is signed in
//! - [`notification`] - Transient messages for the user

pub mod cart;
pub mod notification;
pub mod session;
pub mod user;

pub use cart::{Cart, CartChange, CartLine, Confirmation};
pub use notification::{Notification, NotificationLevel};
pub use session::AuthSession;
pub use user::{Password, UserRecord, UserRegistry};
