//! Core types for Green Earth.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod donation;
pub mod email;
pub mod id;
pub mod price;
pub mod selection;

pub use cart::{Cart, CartLineItem};
pub use donation::{Donation, DonationError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use selection::CategorySelection;
