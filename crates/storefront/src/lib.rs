//! Tienda storefront library.
//!
//! A small shop: a product catalog loaded from JSON, a cart, simulated
//! registration and login, and a simulated checkout. The same [`Shop`]
//! controller drives the web storefront and the `tienda` CLI.
//!
//! [`Shop`]: services::Shop

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
