//! Product list context.

use std::sync::Arc;

use shoply_core::{OrderBy, Page, Product};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::fetch::{FetchState, RequestState};

/// Latest product snapshot plus the selected sort order.
#[derive(Clone)]
pub struct ProductContext {
    api: ApiClient,
    state: RequestState<Page<Product>>,
    order_by: Arc<RwLock<OrderBy>>,
}

impl ProductContext {
    /// Create an idle context sorted by lowest price.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RequestState::new(),
            order_by: Arc::new(RwLock::new(OrderBy::default())),
        }
    }

    /// Products from the latest successful fetch.
    pub async fn products_data(&self) -> Option<Vec<Product>> {
        self.state.snapshot().await.data.map(|page| page.content)
    }

    pub async fn is_loading(&self) -> bool {
        self.state.is_loading().await
    }

    pub async fn error(&self) -> Option<Arc<ApiError>> {
        self.state.error().await
    }

    pub async fn snapshot(&self) -> FetchState<Page<Product>> {
        self.state.snapshot().await
    }

    pub async fn order_by(&self) -> OrderBy {
        *self.order_by.read().await
    }

    /// Change the sort order. The next fetch uses it.
    pub async fn set_order_by(&self, order_by: OrderBy) {
        *self.order_by.write().await = order_by;
    }

    /// Fetch the first product page with the current order and wait for it.
    ///
    /// # Errors
    ///
    /// Returns the error stored in the context when the fetch fails.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, Arc<ApiError>> {
        let query = self.api.product_query(self.order_by().await);
        self.state
            .run(self.api.get_products(&query))
            .await
            .map(|page| page.content)
    }

    /// Mark the context loading now and fetch in the background.
    pub async fn trigger_fetch(&self) -> JoinHandle<()> {
        self.state.begin().await;
        let ctx = self.clone();
        tokio::spawn(async move {
            if let Err(e) = ctx.fetch_products().await {
                tracing::warn!(error = %e, "Product fetch failed");
            }
        })
    }
}
