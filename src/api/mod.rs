pub mod api_types;
pub mod cached_client;
pub mod client;
pub mod types;

pub use cached_client::{CachedCatalogClient, PageKey};
pub use client::CatalogClient;
