//! Core types for Fakeshop.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use category::{Category, CategoryError};
pub use id::ProductId;
pub use price::Price;
pub use product::{Product, Rating};
