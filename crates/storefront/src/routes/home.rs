//! Home page route handler.
//!
//! The home page is the whole app: category and sort controls, the product
//! list, the cart badge and the error toast.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::api::ApiError;
use crate::app;
use crate::state::AppState;

use super::products::{
    ListQuery, OptionView, ProductListView, category_option_views, order_option_views,
};

/// Error toast display data for templates.
#[derive(Clone)]
pub struct ToastView {
    pub message: String,
}

impl From<&ApiError> for ToastView {
    fn from(err: &ApiError) -> Self {
        Self {
            message: err.user_message(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub list: ProductListView,
    pub category_options: Vec<OptionView>,
    pub order_options: Vec<OptionView>,
    pub cart_count: usize,
    pub toast: Option<ToastView>,
}

/// Display the home page.
///
/// Every load mounts the app, triggering one product fetch and one cart
/// fetch; the list then polls its fragment until the products arrive.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let query = query.to_app_query();

    app::apply_order(&state, query.order_by).await;
    app::mount(&state).await;

    let view = app::compose(&state, &query).await;

    IndexTemplate {
        list: ProductListView::from(&view),
        category_options: category_option_views(&view),
        order_options: order_option_views(&view),
        cart_count: view.cart_length,
        toast: view.toast.as_deref().map(ToastView::from),
    }
}

/// Hide the error toast (HTMX). The swapped-out element is simply removed.
#[instrument(skip(state))]
pub async fn dismiss_toast(State(state): State<AppState>) -> StatusCode {
    state.errors().dismiss().await;
    StatusCode::OK
}
