//! Fakeshop Core - Shared domain types and rules.
//!
//! This crate provides the types used by the storefront:
//! - product data as served by the remote catalog
//! - the per-browser cart and favorites collections
//! - the listing predicate (category filter plus title search)
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no sessions,
//! no HTTP clients. Persistence and change notification live in the
//! storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, categories and products
//! - [`cart`] - Cart rows and the cart mutation rules
//! - [`favorites`] - The favorites set
//! - [`query`] - Listing filter over a fetched product list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod favorites;
pub mod query;
pub mod types;

pub use cart::{Cart, CartItem, MIN_QUANTITY, QuantityError};
pub use favorites::Favorites;
pub use query::ProductQuery;
pub use types::*;
