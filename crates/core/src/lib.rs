//! RocketShoes Core - Cart domain types.
//!
//! This crate provides the types shared by the cart store and its callers:
//! - `cart` - The cart store, its store API client and snapshot storage
//! - `cli` - Command-line presentation layer
//!
//! # Architecture
//!
//! The core crate contains only types and pure transitions - no I/O, no HTTP
//! clients, no storage. Every cart mutation returns a new [`Cart`] value and
//! leaves the original untouched.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, products, stock and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
