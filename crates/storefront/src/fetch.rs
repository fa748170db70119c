//! Request-state container for a single asynchronous fetch.
//!
//! Holds `{ data, is_loading, error }` and replaces it wholesale on every
//! invocation: a run first marks the state loading and clears the previous
//! error, then overwrites data or error with the outcome.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::ApiError;

/// Snapshot of a fetch.
#[derive(Debug)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<Arc<ApiError>>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

impl<T: Clone> Clone for FetchState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }
}

/// Shared, cloneable request-state container.
///
/// Clones observe and mutate the same state, so a handler can mark a fetch
/// as started and hand a clone to a background task.
pub struct RequestState<T> {
    inner: Arc<RwLock<FetchState<T>>>,
}

impl<T> Clone for RequestState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(FetchState::default())),
        }
    }
}

impl<T: Clone> RequestState<T> {
    /// Idle state with no data and no error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> FetchState<T> {
        self.inner.read().await.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.is_loading
    }

    pub async fn error(&self) -> Option<Arc<ApiError>> {
        self.inner.read().await.error.clone()
    }

    /// Mark a fetch as started: loading, with the previous error cleared.
    ///
    /// Data from the previous fetch stays until the new outcome replaces it.
    pub async fn begin(&self) {
        let mut state = self.inner.write().await;
        state.is_loading = true;
        state.error = None;
    }

    /// Record the outcome of a fetch and stop loading.
    ///
    /// Success replaces the data; failure drops it and stores the error.
    pub async fn finish(&self, outcome: Result<T, ApiError>) -> Result<T, Arc<ApiError>> {
        let mut state = self.inner.write().await;
        state.is_loading = false;
        match outcome {
            Ok(data) => {
                state.data = Some(data.clone());
                state.error = None;
                Ok(data)
            }
            Err(err) => {
                let err = Arc::new(err);
                state.data = None;
                state.error = Some(Arc::clone(&err));
                Err(err)
            }
        }
    }

    /// Run `request` through the container: begin, await, finish.
    ///
    /// # Errors
    ///
    /// Returns the shared error stored in the container when the request fails.
    pub async fn run<F>(&self, request: F) -> Result<T, Arc<ApiError>>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.begin().await;
        let outcome = request.await;
        self.finish(outcome).await
    }
}
