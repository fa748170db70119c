//! In-process mock backend and state builders for tests.
//!
//! Compiled for this crate's unit tests and, behind the `test-util` feature,
//! for the integration tests.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use shoply_core::{CartEntry, CartItemId, Category, Page, Price, Product, ProductId};
use url::Url;

use crate::config::{ApiConfig, StorefrontConfig};
use crate::state::AppState;

/// Message the mock puts in every failure body.
pub const FAILURE_MESSAGE: &str = "API 에러 발생";

/// How the mock answers a list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Ok,
    Fail(StatusCode),
    /// Never answer.
    Hang,
}

struct MockState {
    products: Vec<Product>,
    cart: Mutex<Vec<CartEntry>>,
    products_behavior: Mutex<Behavior>,
    cart_behavior: Mutex<Behavior>,
    product_queries: Mutex<Vec<String>>,
    cart_hits: AtomicUsize,
    next_cart_id: AtomicI64,
}

/// Handle to a running mock backend.
#[derive(Clone)]
pub struct MockBackend {
    pub url: Url,
    state: Arc<MockState>,
}

impl MockBackend {
    pub fn product_hits(&self) -> usize {
        self.state.product_queries.lock().unwrap().len()
    }

    /// Raw query strings of every `GET /products`, oldest first.
    pub fn product_queries(&self) -> Vec<String> {
        self.state.product_queries.lock().unwrap().clone()
    }

    pub fn cart_hits(&self) -> usize {
        self.state.cart_hits.load(Ordering::SeqCst)
    }

    pub fn set_products_behavior(&self, behavior: Behavior) {
        *self.state.products_behavior.lock().unwrap() = behavior;
    }

    pub fn set_cart_behavior(&self, behavior: Behavior) {
        *self.state.cart_behavior.lock().unwrap() = behavior;
    }

    pub fn cart(&self) -> Vec<CartEntry> {
        self.state.cart.lock().unwrap().clone()
    }
}

pub fn product(id: i64, category: &str, name: &str, price: u64, image: &str) -> Product {
    Product {
        id: ProductId::new(id),
        category: Category::new(category),
        name: name.to_string(),
        price: Price::new(price),
        image_url: image.to_string(),
    }
}

/// The four-product catalog used across the storefront tests.
pub fn sample_products() -> Vec<Product> {
    vec![
        product(1, "패션잡화", "바지", 1_000_000, "laptop.jpg"),
        product(2, "패션잡화", "치마", 50_000, "chair.jpg"),
        product(3, "식료품", "코카콜라", 2000, "coke.jpg"),
        product(4, "식료품", "사이다", 2000, "cider.jpg"),
    ]
}

/// One cart line holding the skirt.
pub fn sample_cart() -> Vec<CartEntry> {
    vec![CartEntry {
        id: CartItemId::new(101),
        product: product(2, "패션잡화", "치마", 50_000, "chair.jpg"),
        quantity: 1,
    }]
}

/// Start a mock backend with the sample catalog and cart.
pub async fn mock_backend() -> MockBackend {
    let state = Arc::new(MockState {
        products: sample_products(),
        cart: Mutex::new(sample_cart()),
        products_behavior: Mutex::new(Behavior::Ok),
        cart_behavior: Mutex::new(Behavior::Ok),
        product_queries: Mutex::new(Vec::new()),
        cart_hits: AtomicUsize::new(0),
        next_cart_id: AtomicI64::new(200),
    });

    let router = Router::new()
        .route("/products", get(list_products))
        .route("/cart-items", get(list_cart).post(add_cart_item))
        .route(
            "/cart-items/{id}",
            patch(update_cart_item).delete(remove_cart_item),
        )
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockBackend {
        url: Url::parse(&format!("http://{addr}/")).unwrap(),
        state,
    }
}

/// Storefront config pointing at `backend`.
pub fn config_for(backend: &MockBackend) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        api: ApiConfig {
            base_url: backend.url.clone(),
            credentials: None,
            page_size: 20,
            timeout: Duration::from_secs(5),
        },
        error_toast_duration: Duration::from_secs(3),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// App state wired to a fresh mock backend.
pub async fn app_state() -> (AppState, MockBackend) {
    let backend = mock_backend().await;
    let state = AppState::new(config_for(&backend)).unwrap();
    (state, backend)
}

async fn respond(behavior: Behavior, ok: impl FnOnce() -> Response) -> Response {
    match behavior {
        Behavior::Ok => ok(),
        Behavior::Fail(status) => (status, Json(json!({ "message": FAILURE_MESSAGE }))).into_response(),
        Behavior::Hang => {
            std::future::pending::<()>().await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}

async fn list_products(State(state): State<Arc<MockState>>, RawQuery(query): RawQuery) -> Response {
    state
        .product_queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());
    let behavior = *state.products_behavior.lock().unwrap();
    respond(behavior, || Json(Page::single(state.products.clone())).into_response()).await
}

async fn list_cart(State(state): State<Arc<MockState>>) -> Response {
    state.cart_hits.fetch_add(1, Ordering::SeqCst);
    let behavior = *state.cart_behavior.lock().unwrap();
    respond(behavior, || {
        Json(Page::single(state.cart.lock().unwrap().clone())).into_response()
    })
    .await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddBody {
    product_id: ProductId,
    quantity: u32,
}

async fn add_cart_item(State(state): State<Arc<MockState>>, Json(body): Json<AddBody>) -> Response {
    let Some(product) = state.products.iter().find(|p| p.id == body.product_id).cloned() else {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "상품이 없습니다."}))).into_response();
    };
    let id = CartItemId::new(state.next_cart_id.fetch_add(1, Ordering::SeqCst));
    state.cart.lock().unwrap().push(CartEntry {
        id,
        product,
        quantity: body.quantity,
    });
    StatusCode::CREATED.into_response()
}

#[derive(Deserialize)]
struct QuantityBody {
    quantity: u32,
}

async fn update_cart_item(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<QuantityBody>,
) -> StatusCode {
    let mut cart = state.cart.lock().unwrap();
    match cart.iter_mut().find(|e| e.id.as_i64() == id) {
        Some(entry) => {
            entry.quantity = body.quantity;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn remove_cart_item(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> StatusCode {
    let mut cart = state.cart.lock().unwrap();
    let before = cart.len();
    cart.retain(|e| e.id.as_i64() != id);
    if cart.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
