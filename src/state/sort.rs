//! Client-side ordering of the fetched page.
//!
//! Sorting only reorders the rows the server returned for the current page;
//! rows on other pages are never compared against each other.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::api::types::Product;

/// Sortable product columns.
///
/// Serialized with the product field names so persisted sort configs stay
/// readable (`{"key": "price", "direction": "asc"}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
  Id,
  Title,
  Brand,
  Sku,
  Rating,
  Price,
  Stock,
  Category,
  DiscountPercentage,
}

impl SortKey {
  pub fn label(&self) -> &'static str {
    match self {
      SortKey::Id => "ID",
      SortKey::Title => "Title",
      SortKey::Brand => "Brand",
      SortKey::Sku => "SKU",
      SortKey::Rating => "Rating",
      SortKey::Price => "Price",
      SortKey::Stock => "Stock",
      SortKey::Category => "Category",
      SortKey::DiscountPercentage => "Discount",
    }
  }

  /// Natural ordering of two products on this field: numeric for numbers,
  /// lexicographic for strings.
  fn compare(&self, a: &Product, b: &Product) -> Ordering {
    match self {
      SortKey::Id => a.id.cmp(&b.id),
      SortKey::Title => a.title.cmp(&b.title),
      SortKey::Brand => a.brand.cmp(&b.brand),
      SortKey::Sku => a.sku.cmp(&b.sku),
      SortKey::Category => a.category.cmp(&b.category),
      SortKey::Rating => a.rating.total_cmp(&b.rating),
      SortKey::Price => a.price.total_cmp(&b.price),
      SortKey::Stock => a.stock.cmp(&b.stock),
      SortKey::DiscountPercentage => a.discount_percentage.total_cmp(&b.discount_percentage),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
  #[serde(rename = "asc")]
  Ascending,
  #[serde(rename = "desc")]
  Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
  pub key: SortKey,
  pub direction: SortDirection,
}

impl SortSpec {
  pub fn ascending(key: SortKey) -> Self {
    Self {
      key,
      direction: SortDirection::Ascending,
    }
  }

  pub fn descending(key: SortKey) -> Self {
    Self {
      key,
      direction: SortDirection::Descending,
    }
  }
}

/// Next sort after selecting `key`'s column.
///
/// Same column cycles ascending → descending → none; another column starts
/// at ascending.
pub fn cycle(current: Option<SortSpec>, key: SortKey) -> Option<SortSpec> {
  match current {
    Some(spec) if spec.key == key => match spec.direction {
      SortDirection::Ascending => Some(SortSpec::descending(key)),
      SortDirection::Descending => None,
    },
    _ => Some(SortSpec::ascending(key)),
  }
}

/// Reorder `items` by `spec`; `None` keeps the server order.
///
/// The sort is stable, so rows with equal keys keep their relative order in
/// both directions and sorting twice gives the same result as sorting once.
pub fn sort_products(items: &[Product], spec: Option<SortSpec>) -> Vec<Product> {
  let mut sorted = items.to_vec();
  if let Some(spec) = spec {
    sorted.sort_by(|a, b| {
      let ord = spec.key.compare(a, b);
      match spec.direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
      }
    });
  }
  sorted
}

/// Arrow shown next to a column header, if it is the sorted one.
pub fn indicator(spec: Option<SortSpec>, key: SortKey) -> &'static str {
  match spec {
    Some(s) if s.key == key => match s.direction {
      SortDirection::Ascending => "↑",
      SortDirection::Descending => "↓",
    },
    _ => "",
  }
}
