//! Shared contexts exposing fetched collections and mutators to the views.
//!
//! Each context is a cheap `Clone` handle over shared state. Handlers read
//! snapshots from them to render, and call their mutators to refetch, reorder
//! or raise errors.
//!
//! - [`ProductContext`] - product list, loading/error state, sort order
//! - [`CartContext`] - cart lines, loading/error state, cart length, cart mutations
//! - [`ErrorContext`] - the global error-toast notifier

pub mod cart;
pub mod errors;
pub mod products;

pub use cart::CartContext;
pub use errors::ErrorContext;
pub use products::ProductContext;
