//! Catalog products.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Product category label as reported by the backend (e.g. `식료품`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Categories the backend is known to use.
    ///
    /// The filter dropdown offers these even before any product has loaded.
    pub const KNOWN: &'static [&'static str] = &["식료품", "패션잡화"];

    /// Create a category from its label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The category label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub category: Category,
    pub name: String,
    pub price: Price,
    pub image_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_backend_shape() {
        let json = r#"{
            "id": 3,
            "category": "식료품",
            "name": "코카콜라",
            "price": 2000,
            "imageUrl": "coke.jpg"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.category.as_str(), "식료품");
        assert_eq!(product.price, Price::new(2000));
        assert_eq!(product.image_url, "coke.jpg");
    }
}
