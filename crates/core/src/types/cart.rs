//! Shopping cart lines.

use serde::{Deserialize, Serialize};

use super::id::CartItemId;
use super::price::Price;
use super::product::Product;

/// A cart line referencing a product and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: CartItemId,
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    /// Price of this line (unit price times quantity).
    #[must_use]
    pub const fn line_price(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Sum of all line prices.
#[must_use]
pub fn cart_total(entries: &[CartEntry]) -> Price {
    entries.iter().map(CartEntry::line_price).sum()
}
