//! Green Earth Core - Shared domain types.
//!
//! This crate provides the types used by every Green Earth component:
//! - `storefront` - Catalog client, cart store and the web storefront
//! - `cli` - Command-line access to the catalog and the local cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no persistence. Cart merge rules and totals live here so they can
//! be tested without a storage backend.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, cart line items, category selection and
//!   donation requests

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
