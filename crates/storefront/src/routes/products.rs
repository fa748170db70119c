//! Product list route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use shoply_core::{CategoryFilter, OrderBy, Product};
use tracing::instrument;

use crate::app::{self, AppQuery, AppView, ListState};
use crate::state::AppState;

use super::home::ToastView;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image_url: String,
    /// Cart line holding this product, if it is in the cart
    pub cart_item_id: Option<String>,
}

/// Dropdown option display data for templates.
#[derive(Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Product list area display data for templates.
#[derive(Clone)]
pub struct ProductListView {
    pub loading: bool,
    pub failure: Option<String>,
    pub products: Vec<ProductCardView>,
    /// Fragment URL reproducing the current filter and order
    pub list_url: String,
}

/// Category and sort parameters shared by the page and the fragment.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

impl ListQuery {
    #[must_use]
    pub fn to_app_query(&self) -> AppQuery {
        AppQuery::from_params(self.category.as_deref(), self.sort.as_deref())
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl ProductCardView {
    fn new(product: &Product, view: &AppView) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.to_string(),
            price: product.price.display(),
            image_url: product.image_url.clone(),
            cart_item_id: view.in_cart.get(&product.id).map(ToString::to_string),
        }
    }
}

impl From<&AppView> for ProductListView {
    fn from(view: &AppView) -> Self {
        let (loading, failure, products) = match &view.list {
            ListState::Loading => (true, None, Vec::new()),
            ListState::Failed(message) => (false, Some(message.clone()), Vec::new()),
            ListState::Ready(products) => (
                false,
                None,
                products
                    .iter()
                    .map(|p| ProductCardView::new(p, view))
                    .collect(),
            ),
        };

        Self {
            loading,
            failure,
            products,
            list_url: list_url(&view.category, view.order_by),
        }
    }
}

/// Category dropdown options.
#[must_use]
pub fn category_option_views(view: &AppView) -> Vec<OptionView> {
    view.category_options
        .iter()
        .map(|option| OptionView {
            value: option.label().to_string(),
            label: option.label().to_string(),
            selected: *option == view.category,
        })
        .collect()
}

/// Sort dropdown options.
#[must_use]
pub fn order_option_views(view: &AppView) -> Vec<OptionView> {
    OrderBy::ALL
        .into_iter()
        .map(|order| OptionView {
            value: order.slug().to_string(),
            label: order.label().to_string(),
            selected: order == view.order_by,
        })
        .collect()
}

/// `/products/list` URL for a filter and order.
fn list_url(category: &CategoryFilter, order_by: OrderBy) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("category", category.label())
        .append_pair("sort", order_by.slug())
        .finish();
    format!("/products/list?{query}")
}

/// Product list fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_list_fragment.html")]
pub struct ProductListTemplate {
    pub list: ProductListView,
    pub toast: Option<ToastView>,
}

/// Display the product list fragment.
///
/// Polled while a fetch is in flight, and re-requested when the filter, the
/// sort order or the cart changes.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let query = query.to_app_query();

    if app::apply_order(&state, query.order_by).await {
        state.products().trigger_fetch().await;
    } else {
        let snapshot = state.products().snapshot().await;
        if !snapshot.is_loading && snapshot.data.is_none() && snapshot.error.is_none() {
            // Fragment requested before any page load mounted the app
            state.products().trigger_fetch().await;
        }
    }

    let view = app::compose(&state, &query).await;

    ProductListTemplate {
        list: ProductListView::from(&view),
        toast: view.toast.as_deref().map(ToastView::from),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{Behavior, app_state};

    async fn get_body(state: AppState, uri: &str) -> (StatusCode, String) {
        let response = crate::routes::routes()
            .with_state(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_list_url_encodes_category() {
        let url = list_url(
            &CategoryFilter::from_param(Some("식료품")),
            OrderBy::PriceDesc,
        );
        assert_eq!(
            url,
            "/products/list?category=%EC%8B%9D%EB%A3%8C%ED%92%88&sort=price-desc"
        );
    }

    #[tokio::test]
    async fn test_list_fragment_filters_by_category() {
        let (state, _backend) = app_state().await;
        state.products().fetch_products().await.unwrap();

        let (status, body) = get_body(state, "/products/list?category=%EC%8B%9D%EB%A3%8C%ED%92%88").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("코카콜라"));
        assert!(body.contains("사이다"));
        assert!(!body.contains("바지"));
        assert!(!body.contains("치마"));
    }

    #[tokio::test]
    async fn test_list_fragment_shows_spinner_while_loading() {
        let (state, backend) = app_state().await;
        backend.set_products_behavior(Behavior::Hang);

        let (status, body) = get_body(state, "/products/list").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"data-testid="loading-spinner""#));
    }

    #[tokio::test]
    async fn test_list_fragment_refetches_on_new_order() {
        let (state, backend) = app_state().await;
        state.products().fetch_products().await.unwrap();
        assert_eq!(backend.product_hits(), 1);

        let (_, body) = get_body(state.clone(), "/products/list?sort=price-desc").await;

        assert!(body.contains(r#"data-testid="loading-spinner""#));
        assert_eq!(state.products().order_by().await, OrderBy::PriceDesc);
    }

    #[tokio::test]
    async fn test_list_fragment_marks_products_in_cart() {
        let (state, _backend) = app_state().await;
        state.products().fetch_products().await.unwrap();
        state.cart().fetch_cart().await.unwrap();

        let (_, body) = get_body(state, "/products/list").await;

        assert!(body.contains(r#"name="cart_item_id" value="101""#));
        assert!(body.contains(r#"name="product_id" value="3""#));
    }
}
