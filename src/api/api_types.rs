//! Serde-deserializable types matching catalog API responses.
//!
//! These types are separate from domain types so the wire shape (`skip`,
//! `products`, error bodies) stays out of the list state code.

use serde::Deserialize;

use super::types::{Page, Product};

// ============================================================================
// Listing and search endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiProductsResponse {
  #[serde(default)]
  pub products: Vec<Product>,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub skip: u64,
  #[serde(default)]
  pub limit: u64,
}

impl ApiProductsResponse {
  /// Convert into a page, trusting the requested limit over the echoed one.
  ///
  /// The server echoes a smaller `limit` on the last page; the page geometry
  /// (`offset = page * limit`) has to stay based on what was asked for.
  pub fn into_page(self, requested_limit: u64) -> Page {
    if self.limit != requested_limit {
      tracing::debug!(
        requested = requested_limit,
        echoed = self.limit,
        skip = self.skip,
        "server echoed a different page limit"
      );
    }
    let mut items = self.products;
    items.truncate(requested_limit as usize);
    Page {
      items,
      total: self.total,
      offset: self.skip,
      limit: requested_limit,
    }
  }
}

// ============================================================================
// Error body
// ============================================================================

/// Error payload sent alongside non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
  pub message: String,
}

/// Pull a human-readable message out of an error response body.
pub fn error_message(body: &str) -> String {
  serde_json::from_str::<ApiErrorBody>(body)
    .map(|b| b.message)
    .unwrap_or_else(|_| {
      let trimmed = body.trim();
      if trimmed.is_empty() {
        "empty response".to_string()
      } else {
        trimmed.to_string()
      }
    })
}
