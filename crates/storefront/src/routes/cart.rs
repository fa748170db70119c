//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation answers with an `HX-Trigger: cart-updated` header so the
//! badge and the product list refresh themselves.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use shoply_core::{CartEntry, CartItemId, ProductId, cart_total};
use tracing::instrument;

use crate::api::ApiError;
use crate::error::{AppError, Result};
use crate::state::AppState;

use super::home::ToastView;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: usize,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&[] as &[CartEntry])
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&[CartEntry]> for CartView {
    fn from(entries: &[CartEntry]) -> Self {
        Self {
            items: entries.iter().map(CartItemView::from).collect(),
            total: cart_total(entries).display(),
            item_count: entries.len(),
        }
    }
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.product.name.clone(),
            category: entry.product.category.to_string(),
            image_url: entry.product.image_url.clone(),
            quantity: entry.quantity,
            price: entry.product.price.display(),
            line_price: entry.line_price().display(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub cart_item_id: CartItemId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub cart_item_id: CartItemId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: usize,
    pub toast: Option<ToastView>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: usize,
}

/// Forward a mutation failure to the toast and turn it into a response error.
async fn raise(state: &AppState, err: Arc<ApiError>) -> AppError {
    state.errors().show_error(Arc::clone(&err)).await;
    AppError::from(err)
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let cart = match state.cart().fetch_cart().await {
        Ok(entries) => CartView::from(entries.as_slice()),
        Err(e) => {
            tracing::warn!("Failed to fetch cart: {e}");
            state.errors().show_error(e).await;
            CartView::empty()
        }
    };

    CartShowTemplate {
        cart,
        cart_count: state.cart().cart_length(),
        toast: state.errors().current().await.as_deref().map(ToastView::from),
    }
}

/// Add a product to the cart (HTMX).
///
/// Returns the cart count badge with an HTMX trigger to update other elements.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    if state.cart().contains_product(form.product_id).await.is_some() {
        return Err(AppError::BadRequest(format!(
            "product {} is already in the cart",
            form.product_id
        )));
    }

    match state.cart().add_product(form.product_id).await {
        Ok(entries) => Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                cart_count: entries.len(),
            },
        )
            .into_response()),
        Err(e) => Err(raise(&state, e).await),
    }
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    match state
        .cart()
        .update_quantity(form.cart_item_id, form.quantity)
        .await
    {
        Ok(entries) => Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from(entries.as_slice()),
            },
        )
            .into_response()),
        Err(e) => Err(raise(&state, e).await),
    }
}

/// Remove an item from the cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    match state.cart().remove_item(form.cart_item_id).await {
        Ok(entries) => Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                cart_count: entries.len(),
            },
        )
            .into_response()),
        Err(e) => Err(raise(&state, e).await),
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        cart_count: state.cart().cart_length(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{Behavior, app_state};

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: AppState, request: Request<Body>) -> Response {
        crate::routes::routes()
            .with_state(state)
            .oneshot(request)
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_cart_view_totals() {
        let entries = crate::test_support::sample_cart();
        let view = CartView::from(entries.as_slice());

        assert_eq!(view.item_count, 1);
        assert_eq!(view.total, "50,000원");
        assert_eq!(view.items[0].line_price, "50,000원");
        assert_eq!(CartView::empty().total, "0원");
    }

    #[tokio::test]
    async fn test_cart_page_lists_entries() {
        let (state, _backend) = app_state().await;

        let response = send(state, Request::builder().uri("/cart").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("치마"));
        assert!(body.contains("50,000원"));
    }

    #[tokio::test]
    async fn test_cart_page_failure_shows_toast() {
        let (state, backend) = app_state().await;
        backend.set_cart_behavior(Behavior::Fail(StatusCode::INTERNAL_SERVER_ERROR));

        let response = send(state, Request::builder().uri("/cart").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(r#"data-testid="error-toast""#));
    }

    #[tokio::test]
    async fn test_add_returns_badge_and_trigger() {
        let (state, backend) = app_state().await;

        let response = send(state.clone(), post_form("/cart/add", "product_id=3")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["HX-Trigger"], "cart-updated");
        assert!(body_text(response).await.contains('2'));
        assert_eq!(backend.cart().len(), 2);
        assert_eq!(state.cart().cart_length(), 2);
    }

    #[tokio::test]
    async fn test_add_duplicate_is_rejected() {
        let (state, backend) = app_state().await;
        state.cart().fetch_cart().await.unwrap();

        let response = send(state, post_form("/cart/add", "product_id=2")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_product_raises_toast() {
        let (state, _backend) = app_state().await;

        let response = send(state.clone(), post_form("/cart/add", "product_id=99")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(state.errors().current().await.is_some());
    }

    #[tokio::test]
    async fn test_remove_and_update() {
        let (state, backend) = app_state().await;

        let response = send(
            state.clone(),
            post_form("/cart/update", "cart_item_id=101&quantity=4"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(backend.cart()[0].quantity, 4);
        assert!(body_text(response).await.contains("200,000원"));

        let response = send(state.clone(), post_form("/cart/remove", "cart_item_id=101")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(backend.cart().is_empty());
        assert_eq!(state.cart().cart_length(), 0);
    }

    #[tokio::test]
    async fn test_malformed_form_is_rejected() {
        let (state, _backend) = app_state().await;

        let response = send(state, post_form("/cart/add", "product_id=abc")).await;

        assert!(response.status().is_client_error());
    }
}
