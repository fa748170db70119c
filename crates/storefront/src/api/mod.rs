//! Backend REST API client.
//!
//! # Architecture
//!
//! - `reqwest` for HTTP, `serde` for the JSON bodies
//! - The backend is the source of truth for products and the cart; the
//!   storefront keeps no copy beyond the latest fetched snapshot
//! - No caching and no retries: every trigger issues exactly one request
//!
//! # Endpoints
//!
//! ```text
//! GET    /products?page=&size=&sort=price,asc   - Paged product list
//! GET    /cart-items?page=0&size=50             - Paged cart lines
//! POST   /cart-items                            - Add a product to the cart
//! PATCH  /cart-items/{id}                       - Change a line's quantity
//! DELETE /cart-items/{id}                       - Remove a line
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use shoply_storefront::api::{ApiClient, ProductQuery};
//!
//! let client = ApiClient::new(&config.api)?;
//! let page = client.get_products(&ProductQuery::new(OrderBy::PriceAsc)).await?;
//! ```

mod client;
pub mod query;

pub use client::ApiClient;
pub use query::ProductQuery;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Create a status error from a code and message.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Message suitable for showing to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "서버 응답이 지연되고 있습니다.".to_string(),
            Self::Http(_) => "서버에 연결할 수 없습니다.".to_string(),
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            Self::Status { status, .. } => format!("요청을 처리하지 못했습니다. ({status})"),
            Self::Parse(_) | Self::InvalidUrl(_) => "잘못된 응답을 받았습니다.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::status(500, "Internal Server Error");
        assert_eq!(
            err.to_string(),
            "API error (status 500): Internal Server Error"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(ApiError::status(404, "").is_not_found());
        assert!(!ApiError::status(500, "").is_not_found());
    }

    #[test]
    fn test_user_message_prefers_backend_message() {
        assert_eq!(
            ApiError::status(400, "재고가 부족합니다.").user_message(),
            "재고가 부족합니다."
        );
        assert_eq!(
            ApiError::status(503, "").user_message(),
            "요청을 처리하지 못했습니다. (503)"
        );
    }
}
