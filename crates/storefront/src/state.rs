//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::context::{CartContext, ErrorContext, ProductContext};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the three contexts, which share one backend client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    products: ProductContext,
    cart: CartContext,
    errors: ErrorContext,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let products = ProductContext::new(api.clone());
        let cart = CartContext::new(api);
        let errors = ErrorContext::new(config.error_toast_duration);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                cart,
                errors,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn products(&self) -> &ProductContext {
        &self.inner.products
    }

    #[must_use]
    pub fn cart(&self) -> &CartContext {
        &self.inner.cart
    }

    #[must_use]
    pub fn errors(&self) -> &ErrorContext {
        &self.inner.errors
    }
}
