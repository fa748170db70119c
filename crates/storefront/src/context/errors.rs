//! Global error-toast notifier.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::api::ApiError;

#[derive(Debug, Clone)]
struct RaisedError {
    error: Arc<ApiError>,
    raised_at: DateTime<Utc>,
    dismissed: bool,
}

#[derive(Debug, Default)]
struct Notices {
    current: Option<RaisedError>,
    /// Every error raised so far that something still holds.
    seen: Vec<Weak<ApiError>>,
}

/// Holds the most recent error for the toast until it expires.
///
/// Raised errors are remembered while a fetch state still holds them, so
/// raising one again stays hidden after it expires or is dismissed.
#[derive(Clone)]
pub struct ErrorContext {
    notices: Arc<RwLock<Notices>>,
    duration: Duration,
}

impl ErrorContext {
    /// Create a notifier whose toasts stay visible for `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            notices: Arc::new(RwLock::new(Notices::default())),
            duration,
        }
    }

    /// Raise an error, replacing the previous one.
    ///
    /// Raising an already raised error again (the same `Arc`) does nothing,
    /// whether its toast is visible, expired or dismissed.
    pub async fn show_error(&self, error: Arc<ApiError>) {
        self.show_error_at(error, Utc::now()).await;
    }

    async fn show_error_at(&self, error: Arc<ApiError>, now: DateTime<Utc>) {
        let mut notices = self.notices.write().await;
        notices.seen.retain(|seen| seen.strong_count() > 0);
        if notices
            .seen
            .iter()
            .any(|seen| std::ptr::eq(seen.as_ptr(), Arc::as_ptr(&error)))
        {
            return;
        }
        tracing::debug!(error = %error, "Showing error toast");
        notices.seen.push(Arc::downgrade(&error));
        notices.current = Some(RaisedError {
            error,
            raised_at: now,
            dismissed: false,
        });
    }

    /// The error to show, if it has not expired or been dismissed.
    pub async fn current(&self) -> Option<Arc<ApiError>> {
        self.current_at(Utc::now()).await
    }

    async fn current_at(&self, now: DateTime<Utc>) -> Option<Arc<ApiError>> {
        let notices = self.notices.read().await;
        let raised = notices.current.as_ref().filter(|raised| !raised.dismissed)?;
        let age = now.signed_duration_since(raised.raised_at).to_std().unwrap_or_default();
        (age < self.duration).then(|| Arc::clone(&raised.error))
    }

    /// Hide the toast.
    pub async fn dismiss(&self) {
        if let Some(raised) = self.notices.write().await.current.as_mut() {
            raised.dismissed = true;
        }
    }
}
