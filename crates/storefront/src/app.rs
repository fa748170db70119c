//! Top-level application composition.
//!
//! A page load "mounts" the app: both fetches are triggered and the page is
//! rendered from whatever the contexts hold at that moment. Fetch errors are
//! forwarded to the error-toast notifier while composing.

use std::collections::HashMap;
use std::sync::Arc;

use shoply_core::{
    CartItemId, CategoryFilter, OrderBy, Product, ProductId, category_options, filter_by_category,
    sort_products,
};
use tokio::task::JoinHandle;

use crate::api::ApiError;
use crate::state::AppState;

/// What the visitor asked for in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppQuery {
    pub category: CategoryFilter,
    pub order_by: Option<OrderBy>,
}

impl AppQuery {
    /// Build from raw query parameters. An unknown sort value is ignored.
    #[must_use]
    pub fn from_params(category: Option<&str>, sort: Option<&str>) -> Self {
        let order_by = sort.and_then(|s| match s.parse::<OrderBy>() {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring sort parameter");
                None
            }
        });

        Self {
            category: CategoryFilter::from_param(category),
            order_by,
        }
    }
}

/// State of the product list area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Failed(String),
    Ready(Vec<Product>),
}

/// Everything a page render needs.
#[derive(Debug, Clone)]
pub struct AppView {
    pub category: CategoryFilter,
    pub category_options: Vec<CategoryFilter>,
    pub order_by: OrderBy,
    pub list: ListState,
    pub cart_length: usize,
    /// Cart line per product already in the cart
    pub in_cart: HashMap<ProductId, CartItemId>,
    pub toast: Option<Arc<ApiError>>,
}

/// Handles of the fetches started by [`mount`].
pub struct Mounted {
    pub products: JoinHandle<()>,
    pub cart: JoinHandle<()>,
}

/// Trigger the product and cart fetches, once each.
pub async fn mount(state: &AppState) -> Mounted {
    Mounted {
        products: state.products().trigger_fetch().await,
        cart: state.cart().trigger_fetch().await,
    }
}

/// Apply a requested sort order. Returns whether it changed.
pub async fn apply_order(state: &AppState, requested: Option<OrderBy>) -> bool {
    let Some(requested) = requested else {
        return false;
    };
    if state.products().order_by().await == requested {
        return false;
    }
    tracing::info!(order_by = requested.slug(), "Sort order changed");
    state.products().set_order_by(requested).await;
    true
}

/// Compose the current context snapshots into a view.
pub async fn compose(state: &AppState, query: &AppQuery) -> AppView {
    let products = state.products().snapshot().await;
    let cart = state.cart().snapshot().await;
    let order_by = state.products().order_by().await;

    for error in [&products.error, &cart.error].into_iter().flatten() {
        state.errors().show_error(Arc::clone(error)).await;
    }

    let all_products = products
        .data
        .as_ref()
        .map(|page| page.content.as_slice())
        .unwrap_or_default();

    let list = if products.is_loading {
        ListState::Loading
    } else if let Some(err) = &products.error {
        ListState::Failed(err.user_message())
    } else if products.data.is_none() {
        // Nothing fetched yet; the list will be polled
        ListState::Loading
    } else {
        let mut visible = filter_by_category(all_products, &query.category);
        sort_products(&mut visible, order_by);
        ListState::Ready(visible)
    };

    let in_cart = cart
        .data
        .as_ref()
        .map(|page| {
            page.content
                .iter()
                .map(|entry| (entry.product.id, entry.id))
                .collect()
        })
        .unwrap_or_default();

    AppView {
        category: query.category.clone(),
        category_options: category_options(all_products),
        order_by,
        list,
        cart_length: state.cart().cart_length(),
        in_cart,
        toast: state.errors().current().await,
    }
}
