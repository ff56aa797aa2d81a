//! NextShop Core - Shared domain types.
//!
//! This crate provides the product catalog types used by every NextShop
//! component:
//! - `api` - The HTTP catalog service
//! - `cli` - Operator tooling (connectivity checks, seeding)
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Storage adapters map their own document types onto these.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, and the product entity itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
