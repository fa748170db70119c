//! Shoply Core - Shared catalog and cart types.
//!
//! This crate provides the domain types used by the Shoply components:
//! - `storefront` - Server-rendered storefront over the backend REST API
//! - `integration-tests` - End-to-end tests against a mock backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Filtering and sorting of the catalog live here so they can be
//! tested without a running backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, cart entries and page envelopes
//! - [`catalog`] - Category filters, sort orders and the list operations over them

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;
