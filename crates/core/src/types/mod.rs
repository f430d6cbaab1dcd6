//! Core types for RocketShoes.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod stock;

pub use cart::{Cart, CartInvariantError};
pub use id::{ParseProductIdError, ProductId};
pub use price::Price;
pub use product::{CartLineItem, Product};
pub use stock::StockInfo;
