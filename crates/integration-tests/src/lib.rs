//! Test harness for end-to-end storefront tests.
//!
//! The mock backend comes from `shoply_storefront::test_support`, which
//! serves the catalog and cart endpoints from memory and records every list
//! request. [`Storefront`] runs the real storefront router on an ephemeral
//! port, configured against it.
//!
//! ```rust,ignore
//! let backend = mock_backend().await;
//! let shop = Storefront::start(&backend).await;
//! let body = shop.get_text("/").await;
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::time::Duration;

use shoply_storefront::state::AppState;
use url::Url;

pub use shoply_storefront::test_support::{
    Behavior, FAILURE_MESSAGE, MockBackend, config_for, mock_backend,
};

/// A storefront server bound to an ephemeral port.
pub struct Storefront {
    base: Url,
    client: reqwest::Client,
}

impl Storefront {
    pub async fn start(backend: &MockBackend) -> Self {
        let state = AppState::new(config_for(backend)).expect("storefront state");
        let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static");
        let app = shoply_storefront::router(state, static_dir);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind storefront");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: Url::parse(&format!("http://{addr}/")).unwrap(),
            client: reqwest::Client::new(),
        }
    }

    /// Absolute URL for `path` with the given query pairs.
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.base.join(path.trim_start_matches('/')).unwrap();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .get(self.url(path, query))
            .send()
            .await
            .expect("storefront request")
    }

    pub async fn get_text(&self, path: &str) -> String {
        self.get(path, &[]).await.text().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path, &[]))
            .form(form)
            .send()
            .await
            .expect("storefront request")
    }

    /// Poll the product list fragment until `done` accepts the body.
    ///
    /// Returns the last body seen, accepted or not.
    pub async fn poll_list(&self, query: &[(&str, &str)], done: impl Fn(&str) -> bool) -> String {
        let mut body = String::new();
        for _ in 0..100 {
            body = self
                .get("/products/list", query)
                .await
                .text()
                .await
                .unwrap();
            if done(&body) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        body
    }
}

/// Wait until `condition` holds, checking every 10ms for up to two seconds.
pub async fn eventually(condition: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
