//! Async query abstraction for data fetching from views.
//!
//! Inspired by TanStack Query, `Query<T>` runs a fetch on the tokio runtime
//! and hands the result back when the event loop polls it on tick.
//!
//! # Example
//!
//! ```ignore
//! let client = catalog.clone();
//! let mut query = Query::new(move || {
//!     let client = client.clone();
//!     async move { client.get_product(1).await }
//! });
//!
//! query.fetch();
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//! ```
//!
//! The last successful value stays readable through `data()` while a newer
//! fetch is loading or after it failed, so views keep showing rows instead
//! of flashing empty.

use crate::error::{CatalogError, CatalogResult};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is currently fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(CatalogError),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  #[cfg(test)]
  pub fn is_success(&self) -> bool {
    matches!(self, QueryState::Success(_))
  }

  #[cfg(test)]
  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&CatalogError> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = CatalogResult<T>> + Send>>;

type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// Async query with loading/success/error state.
///
/// A query either owns a fetcher closure (`new`) and is driven with
/// `fetch`/`refetch`, or is `manual` and is handed a future per request with
/// `run`, for requests whose arguments change between calls.
pub struct Query<T> {
  state: QueryState<T>,
  previous: Option<T>,
  fetcher: Option<FetcherFn<T>>,
  receiver: Option<mpsc::UnboundedReceiver<CatalogResult<T>>>,
}

impl<T: Send + 'static> Query<T> {
  /// Create a query with a fetcher. The fetcher is called each time
  /// `fetch()` or `refetch()` starts a request.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CatalogResult<T>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      previous: None,
      fetcher: Some(Box::new(move || Box::pin(fetcher()))),
      receiver: None,
    }
  }

  /// Create a query without a fetcher; start requests with `run`.
  pub fn manual() -> Self {
    Self {
      state: QueryState::Idle,
      previous: None,
      fetcher: None,
      receiver: None,
    }
  }

  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  /// The current value, or the last successful one while loading or failed.
  pub fn data(&self) -> Option<&T> {
    self.state.data().or(self.previous.as_ref())
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  #[cfg(test)]
  pub fn is_success(&self) -> bool {
    self.state.is_success()
  }

  #[cfg(test)]
  pub fn is_error(&self) -> bool {
    self.state.is_error()
  }

  pub fn error(&self) -> Option<&CatalogError> {
    self.state.error()
  }

  /// Start fetching if not already loading. No-op for manual queries.
  pub fn fetch(&mut self) {
    if self.state.is_loading() {
      return;
    }
    self.start_fetch();
  }

  /// Force a refetch, dropping any pending result.
  pub fn refetch(&mut self) {
    self.receiver = None;
    self.start_fetch();
  }

  /// Start `future` as the current request. A result still pending from an
  /// earlier request is discarded when it arrives.
  pub fn run<Fut>(&mut self, future: Fut)
  where
    Fut: Future<Output = CatalogResult<T>> + Send + 'static,
  {
    self.spawn(Box::pin(future));
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed. Call this in the event loop tick.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = QueryState::Success(data);
        self.previous = None;
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.state = QueryState::Error(error);
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Task ended without sending, e.g. it panicked
        self.state = QueryState::Error(CatalogError::Network("request was cancelled".to_string()));
        self.receiver = None;
        true
      }
    }
  }

  fn start_fetch(&mut self) {
    let future = match &self.fetcher {
      Some(fetcher) => fetcher(),
      None => return,
    };
    self.spawn(future);
  }

  fn spawn(&mut self, future: BoxFuture<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);

    if let QueryState::Success(data) = std::mem::replace(&mut self.state, QueryState::Loading) {
      self.previous = Some(data);
    }

    tokio::spawn(async move {
      let result = future.await;
      // Receiver may have been replaced by a newer request
      let _ = tx.send(result);
    });
  }
}

// Query is not Clone because the fetcher is boxed and receiver is owned.

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("previous", &self.previous)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
  }

  #[tokio::test]
  async fn test_query_success() {
    let mut query = Query::new(|| async { Ok(vec![1, 2, 3]) });

    assert!(matches!(query.state(), QueryState::Idle));

    query.fetch();
    assert!(query.is_loading());

    settle().await;

    assert!(query.poll());
    assert!(query.is_success());
    assert_eq!(query.data(), Some(&vec![1, 2, 3]));
  }

  #[tokio::test]
  async fn test_query_error() {
    let mut query: Query<i32> =
      Query::new(|| async { Err(CatalogError::Network("connection refused".to_string())) });

    query.fetch();
    settle().await;

    assert!(query.poll());
    assert!(query.is_error());
    assert_eq!(
      query.error(),
      Some(&CatalogError::Network("connection refused".to_string()))
    );
  }

  #[tokio::test]
  async fn test_fetch_while_loading_is_noop() {
    let mut query = Query::new(|| async {
      tokio::time::sleep(Duration::from_millis(100)).await;
      Ok(42)
    });

    query.fetch();
    assert!(query.is_loading());

    query.fetch();
    assert!(query.is_loading());
  }

  #[tokio::test]
  async fn test_refetch_cancels_pending() {
    let counter = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
    let counter_clone = counter.clone();

    let mut query = Query::new(move || {
      let counter = counter_clone.clone();
      async move {
        let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(n)
      }
    });

    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;

    query.refetch();
    tokio::time::sleep(Duration::from_millis(100)).await;

    query.poll();
    // Only the second fetch should have been received
    assert_eq!(query.data(), Some(&1));
  }

  #[tokio::test]
  async fn test_previous_data_visible_while_loading_and_after_error() {
    let mut query: Query<&str> = Query::manual();
    query.run(async { Ok("first page") });
    settle().await;
    query.poll();

    query.run(async {
      tokio::time::sleep(Duration::from_millis(30)).await;
      Err(CatalogError::Server {
        status: 500,
        message: "boom".to_string(),
      })
    });
    assert!(query.is_loading());
    assert_eq!(query.data(), Some(&"first page"));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(query.poll());
    assert!(query.is_error());
    assert_eq!(query.data(), Some(&"first page"));
  }

  #[tokio::test]
  async fn test_run_discards_superseded_result() {
    let mut query: Query<&str> = Query::manual();
    query.run(async {
      tokio::time::sleep(Duration::from_millis(50)).await;
      Ok("phone")
    });
    query.run(async { Ok("laptop") });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(query.poll());
    assert_eq!(query.data(), Some(&"laptop"));
    assert!(!query.poll());
  }

  #[tokio::test]
  async fn test_manual_fetch_is_noop() {
    let mut query: Query<u8> = Query::manual();
    query.fetch();
    assert!(matches!(query.state(), QueryState::Idle));

    assert!(!query.poll());
    assert_eq!(query.data(), None);
  }
}
