//! Cached catalog client that wraps CatalogClient with transparent page caching.

use std::time::Duration;

use crate::cache::{CacheResult, Lookup, QueryCache};
use crate::error::CatalogResult;

use super::client::CatalogClient;
use super::types::{Page, Product, ProductDraft};

/// Cache key of a listing page: the committed search term and page index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
  pub term: String,
  pub page: u64,
}

impl PageKey {
  pub fn new(term: impl Into<String>, page: u64) -> Self {
    Self {
      term: term.into(),
      page,
    }
  }
}

/// Catalog client with transparent page caching.
///
/// Listing pages go through the query cache; single products and writes go
/// straight to the network. Creating a product does not invalidate cached
/// pages.
#[derive(Clone)]
pub struct CachedCatalogClient {
  inner: CatalogClient,
  pages: QueryCache<PageKey, Page>,
  page_size: u64,
}

impl CachedCatalogClient {
  pub fn new(inner: CatalogClient, page_size: u64, stale_time: Duration) -> Self {
    Self {
      inner,
      pages: QueryCache::new().with_stale_time(stale_time),
      page_size,
    }
  }

  /// Fetch a listing page with caching.
  pub async fn fetch_page(&self, key: PageKey) -> CatalogResult<CacheResult<Page>> {
    let inner = self.inner.clone();
    let limit = self.page_size;
    let PageKey { term, page } = key.clone();

    self
      .pages
      .fetch(key, move || async move {
        inner.fetch_page(&term, page, limit).await
      })
      .await
  }

  /// Cached state of a page without touching the network.
  pub fn peek_page(&self, key: &PageKey) -> Lookup<Page> {
    self.pages.peek(key)
  }

  /// Forget a cached page so the next fetch hits the network.
  pub fn invalidate_page(&self, key: &PageKey) {
    self.pages.invalidate(key);
  }

  /// Get a single product (not cached - detail views always show live data).
  pub async fn get_product(&self, id: u64) -> CatalogResult<Product> {
    self.inner.get_product(id).await
  }

  /// Create a product (not cached - write operation).
  pub async fn create(&self, draft: ProductDraft) -> CatalogResult<Product> {
    self.inner.create(draft).await
  }
}
