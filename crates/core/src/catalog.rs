//! Category filters, sort orders and the list operations over them.
//!
//! Filtering happens on the storefront after the products are fetched;
//! sorting is requested from the backend and re-applied locally so the
//! rendered order always matches the selected one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Category, Product};

/// Label of the "all categories" option.
pub const ALL_CATEGORIES_LABEL: &str = "전체";

/// Category selection for the product list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a query parameter value.
    ///
    /// Missing, blank, `전체` and `all` all select every category.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(ALL_CATEGORIES_LABEL) => Self::All,
            Some(v) if v.eq_ignore_ascii_case("all") => Self::All,
            Some(v) => Self::Only(Category::new(v)),
        }
    }

    /// Display label (also used as the query parameter value).
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES_LABEL,
            Self::Only(category) => category.as_str(),
        }
    }

    /// Whether a product passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => &product.category == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Product sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderBy {
    /// Lowest price first.
    #[default]
    PriceAsc,
    /// Highest price first.
    PriceDesc,
}

impl OrderBy {
    /// Every order, in dropdown order.
    pub const ALL: [Self; 2] = [Self::PriceAsc, Self::PriceDesc];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceAsc => "낮은 가격순",
            Self::PriceDesc => "높은 가격순",
        }
    }

    /// URL slug used by the storefront's own query string.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    /// Value of the backend's `sort` parameter.
    #[must_use]
    pub const fn sort_param(self) -> &'static str {
        match self {
            Self::PriceAsc => "price,asc",
            Self::PriceDesc => "price,desc",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error parsing an [`OrderBy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order: {0}")]
pub struct ParseOrderByError(String);

impl FromStr for OrderBy {
    type Err = ParseOrderByError;

    /// Accepts the slug, the backend sort value or the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|order| s == order.slug() || s == order.sort_param() || s == order.label())
            .ok_or_else(|| ParseOrderByError(s.to_string()))
    }
}

/// Products passing `filter`, in input order.
#[must_use]
pub fn filter_by_category(products: &[Product], filter: &CategoryFilter) -> Vec<Product> {
    products
        .iter()
        .filter(|product| filter.matches(product))
        .cloned()
        .collect()
}

/// Stable sort by price in the given direction, ties broken by ascending id.
pub fn sort_products(products: &mut [Product], order: OrderBy) {
    products.sort_by(|a, b| {
        let by_price = match order {
            OrderBy::PriceAsc => a.price.cmp(&b.price),
            OrderBy::PriceDesc => b.price.cmp(&a.price),
        };
        by_price.then_with(|| a.id.cmp(&b.id))
    });
}

/// Filter options for the category dropdown.
///
/// `All` first, then the known categories, then any other category present
/// in `products` in first-seen order.
#[must_use]
pub fn category_options(products: &[Product]) -> Vec<CategoryFilter> {
    let mut options = vec![CategoryFilter::All];
    let known = Category::KNOWN.iter().map(|label| Category::new(*label));
    let seen = products.iter().map(|product| product.category.clone());

    for category in known.chain(seen) {
        let option = CategoryFilter::Only(category);
        if !options.contains(&option) {
            options.push(option);
        }
    }
    options
}
