//! Cart context.
//!
//! Mutations go straight to the backend and are followed by a refetch, so
//! the snapshot always reflects the server's cart.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shoply_core::{CartEntry, CartItemId, Page, ProductId};
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::fetch::{FetchState, RequestState};

/// Latest cart snapshot plus the badge count.
#[derive(Clone)]
pub struct CartContext {
    api: ApiClient,
    state: RequestState<Page<CartEntry>>,
    cart_length: Arc<AtomicUsize>,
}

impl CartContext {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RequestState::new(),
            cart_length: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Cart lines from the latest successful fetch.
    pub async fn cart_data(&self) -> Option<Vec<CartEntry>> {
        self.state.snapshot().await.data.map(|page| page.content)
    }

    pub async fn is_loading(&self) -> bool {
        self.state.is_loading().await
    }

    pub async fn error(&self) -> Option<Arc<ApiError>> {
        self.state.error().await
    }

    pub async fn snapshot(&self) -> FetchState<Page<CartEntry>> {
        self.state.snapshot().await
    }

    /// Number of distinct lines shown on the cart badge.
    #[must_use]
    pub fn cart_length(&self) -> usize {
        self.cart_length.load(Ordering::Relaxed)
    }

    pub fn set_cart_length(&self, length: usize) {
        self.cart_length.store(length, Ordering::Relaxed);
    }

    /// The cart line holding `product_id`, if any.
    pub async fn contains_product(&self, product_id: ProductId) -> Option<CartItemId> {
        self.cart_data()
            .await?
            .iter()
            .find(|entry| entry.product.id == product_id)
            .map(|entry| entry.id)
    }

    /// Fetch the cart and wait for it. Updates the cart length on success.
    ///
    /// # Errors
    ///
    /// Returns the error stored in the context when the fetch fails.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<Vec<CartEntry>, Arc<ApiError>> {
        let entries = self
            .state
            .run(self.api.get_cart())
            .await
            .map(|page| page.content)?;
        self.set_cart_length(entries.len());
        Ok(entries)
    }

    /// Mark the context loading now and fetch in the background.
    pub async fn trigger_fetch(&self) -> JoinHandle<()> {
        self.state.begin().await;
        let ctx = self.clone();
        tokio::spawn(async move {
            if let Err(e) = ctx.fetch_cart().await {
                tracing::warn!(error = %e, "Cart fetch failed");
            }
        })
    }

    /// Add one unit of a product, then refetch.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the add or the refetch fails.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Vec<CartEntry>, Arc<ApiError>> {
        self.api.add_cart_item(product_id).await.map_err(Arc::new)?;
        self.fetch_cart().await
    }

    /// Remove a cart line, then refetch.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the removal or the refetch fails.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: CartItemId) -> Result<Vec<CartEntry>, Arc<ApiError>> {
        self.api.remove_cart_item(id).await.map_err(Arc::new)?;
        self.fetch_cart().await
    }

    /// Set a line's quantity, then refetch. Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the update or the refetch fails.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        id: CartItemId,
        quantity: u32,
    ) -> Result<Vec<CartEntry>, Arc<ApiError>> {
        if quantity == 0 {
            return self.remove_item(id).await;
        }
        self.api.update_cart_item(id, quantity).await.map_err(Arc::new)?;
        self.fetch_cart().await
    }
}
