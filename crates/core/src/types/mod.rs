//! Core types for the NextShop catalog.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::ProductId;
pub use price::{Price, PriceError};
pub use product::{NewProduct, Product, ProductError, parse_image_url};
