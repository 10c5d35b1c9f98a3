//! Tienda Core - Shared domain types.
//!
//! This crate provides the types shared by all Tienda components:
//! - `storefront` - Cart, session and checkout logic plus the web front end
//! - `cli` - Terminal front end and simulation tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no HTTP clients.
//! Validation lives in the constructors so the rest of the workspace can rely
//! on a parsed value being well-formed.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails and usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
