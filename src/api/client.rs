use crate::api::api_types::{error_message, ApiProductsResponse};
use crate::api::types::{AuthUser, Credentials, Page, Product, ProductDraft};
use crate::config::Config;
use crate::error::{CatalogError, CatalogResult};
use color_eyre::{eyre::eyre, Result};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Catalog API client.
///
/// Stateless apart from the bearer token; cloning is cheap and shares the
/// underlying connection pool.
#[derive(Clone)]
pub struct CatalogClient {
  http: reqwest::Client,
  base_url: Url,
  token: Option<String>,
}

impl CatalogClient {
  pub fn new(config: &Config) -> Result<Self> {
    Self::with_base_url(&config.api.url, config.request_timeout())
  }

  pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
    let base_url =
      Url::parse(base_url).map_err(|e| eyre!("Invalid API url {}: {}", base_url, e))?;
    if base_url.cannot_be_a_base() {
      return Err(eyre!("Invalid API url {}: not a base url", base_url));
    }

    let http = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url,
      token: None,
    })
  }

  /// Copy of this client that authenticates with the given bearer token.
  pub fn with_token(&self, token: impl Into<String>) -> Self {
    Self {
      token: Some(token.into()),
      ..self.clone()
    }
  }

  /// List products without a search filter
  pub async fn list(&self, limit: u64, offset: u64) -> CatalogResult<Page> {
    let url = self.endpoint(
      &["products"],
      &[("limit", limit.to_string()), ("skip", offset.to_string())],
    );
    let response: ApiProductsResponse = self.send(self.http.get(url)).await?;
    Ok(response.into_page(limit))
  }

  /// Full-text search. `term` must be non-empty.
  pub async fn search(&self, term: &str, limit: u64, offset: u64) -> CatalogResult<Page> {
    let url = self.endpoint(
      &["products", "search"],
      &[
        ("q", term.to_string()),
        ("limit", limit.to_string()),
        ("skip", offset.to_string()),
      ],
    );
    let response: ApiProductsResponse = self.send(self.http.get(url)).await?;
    Ok(response.into_page(limit))
  }

  /// Fetch the given page index, searching when `term` is non-empty.
  pub async fn fetch_page(&self, term: &str, page: u64, limit: u64) -> CatalogResult<Page> {
    let offset = page
      .checked_mul(limit)
      .ok_or_else(|| CatalogError::validation("page", format!("page {} is out of range", page)))?;
    if term.is_empty() {
      self.list(limit, offset).await
    } else {
      self.search(term, limit, offset).await
    }
  }

  /// Get a single product by id
  pub async fn get_product(&self, id: u64) -> CatalogResult<Product> {
    let url = self.endpoint(&["products", &id.to_string()], &[]);
    self.send(self.http.get(url)).await
  }

  /// Create a product from dialog input.
  ///
  /// The draft is validated before anything is sent; a rejected draft never
  /// reaches the network.
  pub async fn create(&self, draft: ProductDraft) -> CatalogResult<Product> {
    draft.validate()?;

    let body = draft.into_product();
    let url = self.endpoint(&["products", "add"], &[]);
    let created: Product = self.send(self.http.post(url).json(&body)).await?;

    tracing::info!(id = created.id, title = %created.title, "product created");
    Ok(created)
  }

  /// Exchange credentials for a user record carrying a bearer token
  pub async fn login(&self, credentials: &Credentials) -> CatalogResult<AuthUser> {
    let url = self.endpoint(&["auth", "login"], &[]);
    self.send(self.http.post(url).json(credentials)).await
  }

  fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
    let mut url = self.base_url.clone();
    // `cannot_be_a_base` was rejected in the constructor, so segments are available
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    if !query.is_empty() {
      let mut pairs = url.query_pairs_mut();
      for (k, v) in query {
        pairs.append_pair(k, v);
      }
    }
    url
  }

  async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> CatalogResult<T> {
    let request = match &self.token {
      Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
      None => request,
    };

    let response = request.send().await.map_err(|e| {
      tracing::warn!(error = %e, "request failed");
      CatalogError::Network(e.to_string())
    })?;

    let status = response.status();
    tracing::debug!(url = %response.url(), status = status.as_u16(), "response");

    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(CatalogError::Server {
        status: status.as_u16(),
        message: error_message(&body),
      });
    }

    response
      .json::<T>()
      .await
      .map_err(|e| CatalogError::Server {
        status: status.as_u16(),
        message: format!("malformed response: {}", e),
      })
  }
}
