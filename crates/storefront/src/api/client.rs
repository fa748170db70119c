//! HTTP client for the catalog and cart endpoints.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shoply_core::{CartEntry, CartItemId, Page, Product, ProductId};
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, ProductQuery};
use crate::config::{ApiConfig, ApiCredentials};

/// Cart lines requested per fetch.
const CART_PAGE_SIZE: u32 = 50;

/// Maximum characters of an error body kept in [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// Client for the backend REST API.
///
/// Cheaply cloneable; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<ApiCredentials>,
    page_size: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddCartItemRequest {
    product_id: ProductId,
    quantity: u32,
}

#[derive(Serialize)]
struct UpdateQuantityRequest {
    quantity: u32,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                credentials: config.credentials.clone(),
                page_size: config.page_size,
            }),
        })
    }

    /// Product query with the configured page size.
    #[must_use]
    pub fn product_query(&self, order_by: shoply_core::OrderBy) -> ProductQuery {
        ProductQuery::new(order_by).with_size(self.inner.page_size)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not a product page.
    #[instrument(skip(self), fields(order_by = %query.order_by.slug()))]
    pub async fn get_products(&self, query: &ProductQuery) -> Result<Page<Product>, ApiError> {
        let request = self.inner.client.get(self.url(&query.path())?);
        let page: Page<Product> = self.send_json(request).await?;
        debug!(count = page.content.len(), "Fetched products");
        Ok(page)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a cart page.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Page<CartEntry>, ApiError> {
        let path = format!("cart-items?page=0&size={CART_PAGE_SIZE}");
        let request = self.inner.client.get(self.url(&path)?);
        let page: Page<CartEntry> = self.send_json(request).await?;
        debug!(count = page.content.len(), "Fetched cart");
        Ok(page)
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self))]
    pub async fn add_cart_item(&self, product_id: ProductId) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("cart-items")?)
            .json(&AddCartItemRequest {
                product_id,
                quantity: 1,
            });
        self.send(request).await.map(drop)
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self))]
    pub async fn update_cart_item(&self, id: CartItemId, quantity: u32) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .patch(self.url(&format!("cart-items/{id}"))?)
            .json(&UpdateQuantityRequest { quantity });
        self.send(request).await.map(drop)
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self))]
    pub async fn remove_cart_item(&self, id: CartItemId) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .delete(self.url(&format!("cart-items/{id}"))?);
        self.send(request).await.map(drop)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request, mapping non-success statuses to [`ApiError::Status`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match &self.inner.credentials {
            Some(creds) => {
                request.basic_auth(&creds.username, Some(creds.password.expose_secret()))
            }
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Backend returned non-success status"
        );
        Err(ApiError::status(status.as_u16(), error_message(&body)))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        // Read as text first so a bad body shows up as a parse error with context
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }
}

/// Extract a readable message from an error body.
///
/// Prefers a JSON `message` field, otherwise the body truncated to
/// [`MAX_ERROR_BODY`] characters.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().chars().take(MAX_ERROR_BODY).collect())
}
