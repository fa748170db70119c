//! End-to-end storefront tests over real HTTP.
//!
//! Each test starts its own mock backend and storefront, so they run in
//! parallel without sharing state.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use reqwest::StatusCode;
use shoply_integration_tests::{Behavior, FAILURE_MESSAGE, Storefront, eventually, mock_backend};

const GROCERIES: &str = "식료품";

fn loaded(body: &str) -> bool {
    !body.contains("loading-spinner")
}

#[tokio::test]
async fn test_health() {
    let backend = mock_backend().await;
    let shop = Storefront::start(&backend).await;

    let response = shop.get("/health", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_page_load_fetches_products_and_cart_once() {
    let backend = mock_backend().await;
    let shop = Storefront::start(&backend).await;

    let response = shop.get("/", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("전체"));
    assert!(body.contains("낮은 가격순"));
    assert!(body.contains("높은 가격순"));

    assert!(eventually(|| backend.product_hits() == 1 && backend.cart_hits() == 1).await);

    // Polling the fragment after the data arrived must not fetch again
    let list = shop.poll_list(&[], loaded).await;
    assert!(list.contains("바지"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.product_hits(), 1);
    assert_eq!(backend.cart_hits(), 1);
    assert_eq!(backend.product_queries()[0], "page=0&size=20&sort=price%2Casc");
}

#[tokio::test]
async fn test_category_filter() {
    let backend = mock_backend().await;
    let shop = Storefront::start(&backend).await;
    shop.get("/", &[]).await;

    let body = shop.poll_list(&[("category", GROCERIES)], loaded).await;

    assert!(body.contains("코카콜라"));
    assert!(body.contains("사이다"));
    assert!(!body.contains("바지"));
    assert!(!body.contains("치마"));
}

#[tokio::test]
async fn test_all_category_shows_everything_cheapest_first() {
    let backend = mock_backend().await;
    let shop = Storefront::start(&backend).await;
    shop.get("/", &[]).await;

    let body = shop.poll_list(&[("category", "전체")], loaded).await;

    let cola = body.find("코카콜라").unwrap();
    let skirt = body.find("치마").unwrap();
    let pants = body.find("바지").unwrap();
    assert!(cola < skirt && skirt < pants);
    assert!(body.contains("1,000,000원"));
}

#[tokio::test]
async fn test_sort_change_refetches_with_new_order() {
    let backend = mock_backend().await;
    let shop = Storefront::start(&backend).await;
    shop.get("/", &[]).await;
    assert!(eventually(|| backend.product_hits() == 1).await);

    let body = shop.poll_list(&[("sort", "price-desc")], loaded).await;

    assert!(eventually(|| backend.product_hits() == 2).await);
    assert_eq!(
        backend.product_queries().last().unwrap(),
        "page=0&size=20&sort=price%2Cdesc"
    );
    let pants = body.find("바지").unwrap();
    let cola = body.find("코카콜라").unwrap();
    assert!(pants < cola);
}

#[tokio::test]
async fn test_spinner_while_backend_is_slow() {
    let backend = mock_backend().await;
    backend.set_products_behavior(Behavior::Hang);
    let shop = Storefront::start(&backend).await;

    let page = shop.get_text("/").await;
    assert!(page.contains(r#"data-testid="loading-spinner""#));

    let list = shop.get_text("/products/list").await;
    assert!(list.contains(r#"data-testid="loading-spinner""#));
    assert!(!list.contains("바지"));
}

#[tokio::test]
async fn test_failed_fetch_shows_error_toast() {
    let backend = mock_backend().await;
    backend.set_products_behavior(Behavior::Fail(StatusCode::INTERNAL_SERVER_ERROR));
    let shop = Storefront::start(&backend).await;
    shop.get("/", &[]).await;

    let body = shop.poll_list(&[], |b| b.contains("error-toast")).await;

    assert!(body.contains(r#"data-testid="error-toast""#));
    assert!(body.contains(FAILURE_MESSAGE));
    assert!(!body.contains("loading-spinner"));

    let dismissed = shop.post_form("/toast/dismiss", &[]).await;
    assert_eq!(dismissed.status(), StatusCode::OK);
    backend.set_products_behavior(Behavior::Ok);
    let page = shop.get_text("/").await;
    assert!(!page.contains(r#"data-testid="error-toast""#));
}

#[tokio::test]
async fn test_dismissed_toast_stays_hidden_on_category_change() {
    let backend = mock_backend().await;
    backend.set_products_behavior(Behavior::Fail(StatusCode::INTERNAL_SERVER_ERROR));
    let shop = Storefront::start(&backend).await;
    shop.get("/", &[]).await;
    let body = shop.poll_list(&[], |b| b.contains("error-toast")).await;
    assert!(body.contains(r#"data-testid="error-toast""#));

    shop.post_form("/toast/dismiss", &[]).await;
    let body = shop.get("/products/list", &[("category", GROCERIES)]).await.text().await.unwrap();

    assert!(!body.contains("error-toast"));
    assert!(body.contains(FAILURE_MESSAGE));
    assert_eq!(backend.product_hits(), 1);
}

#[tokio::test]
async fn test_add_then_remove_cart_item() {
    let backend = mock_backend().await;
    let shop = Storefront::start(&backend).await;

    let added = shop.post_form("/cart/add", &[("product_id", "3")]).await;
    assert_eq!(added.status(), StatusCode::OK);
    assert_eq!(added.headers()["HX-Trigger"], "cart-updated");
    assert!(added.text().await.unwrap().contains(">2<"));
    assert_eq!(backend.cart().len(), 2);

    let new_id = backend
        .cart()
        .iter()
        .find(|entry| entry.product.name == "코카콜라")
        .map(|entry| entry.id.to_string())
        .unwrap();

    let removed = shop
        .post_form("/cart/remove", &[("cart_item_id", new_id.as_str())])
        .await;
    assert_eq!(removed.status(), StatusCode::OK);
    assert!(removed.text().await.unwrap().contains(">1<"));
    assert_eq!(backend.cart().len(), 1);
}

#[tokio::test]
async fn test_adding_product_twice_is_rejected() {
    let backend = mock_backend().await;
    let shop = Storefront::start(&backend).await;

    let first = shop.post_form("/cart/add", &[("product_id", "1")]).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = shop.post_form("/cart/add", &[("product_id", "1")]).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(backend.cart().len(), 2);
}

#[tokio::test]
async fn test_cart_page_shows_total() {
    let backend = mock_backend().await;
    let shop = Storefront::start(&backend).await;

    let updated = shop
        .post_form("/cart/update", &[("cart_item_id", "101"), ("quantity", "3")])
        .await;
    assert_eq!(updated.status(), StatusCode::OK);

    let page = shop.get_text("/cart").await;
    assert!(page.contains("치마"));
    assert!(page.contains("150,000원"));
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let backend = mock_backend().await;
    let shop = Storefront::start(&backend).await;

    let response = shop.get("/static/main.css", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
}
