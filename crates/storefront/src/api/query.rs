//! Product list query-string builder.

use shoply_core::OrderBy;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Parameters of a product list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: u32,
    pub size: u32,
    pub order_by: OrderBy,
}

impl ProductQuery {
    /// First page with the default size, sorted by `order_by`.
    #[must_use]
    pub const fn new(order_by: OrderBy) -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            order_by,
        }
    }

    #[must_use]
    pub const fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Encoded query string, e.g. `page=0&size=20&sort=price%2Casc`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("page", &self.page.to_string())
            .append_pair("size", &self.size.to_string())
            .append_pair("sort", self.order_by.sort_param())
            .finish()
    }

    /// Path and query relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> String {
        format!("products?{}", self.to_query_string())
    }
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self::new(OrderBy::default())
    }
}
