//! Core types for Shoply.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod page;
pub mod price;
pub mod product;

pub use cart::{CartEntry, cart_total};
pub use id::*;
pub use page::Page;
pub use price::Price;
pub use product::{Category, Product};
