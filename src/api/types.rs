use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// Product record as owned by the remote catalog.
///
/// Treated as an immutable value once fetched. Fields the server omits fall
/// back to their defaults so partially populated records still render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
  pub id: u64,
  pub title: String,
  pub description: String,
  pub price: f64,
  pub discount_percentage: f64,
  pub rating: f64,
  pub stock: i64,
  pub brand: String,
  pub category: String,
  pub thumbnail: String,
  pub images: Vec<String>,
  pub sku: String,
  pub weight: f64,
  pub dimensions: Dimensions,
  pub warranty_information: String,
  pub shipping_information: String,
  pub availability_status: String,
  pub reviews: Vec<Review>,
  pub return_policy: String,
  pub minimum_order_quantity: u32,
  pub meta: ProductMeta,
  pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
  pub width: f64,
  pub height: f64,
  pub depth: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductMeta {
  pub created_at: String,
  pub updated_at: String,
  pub barcode: String,
  pub qr_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Review {
  pub rating: f64,
  pub comment: String,
  pub date: String,
  pub reviewer_name: String,
  pub reviewer_email: String,
}

/// One page of a listing or search result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
  pub items: Vec<Product>,
  /// Total number of matches on the server, across all pages
  pub total: u64,
  pub offset: u64,
  pub limit: u64,
}

impl Page {
  /// Number of pages needed to show `total` items, at least one.
  pub fn page_count(&self) -> u64 {
    page_count(self.total, self.limit)
  }
}

/// `ceil(total / limit)`, never less than one so page 0 is always valid.
pub fn page_count(total: u64, limit: u64) -> u64 {
  if limit == 0 {
    return 1;
  }
  total.div_ceil(limit).max(1)
}

/// Input of the "add product" dialog, already parsed from text fields.
///
/// `None` on a required field means the field was left empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
  pub title: String,
  pub price: Option<f64>,
  pub brand: String,
  pub sku: String,
  pub description: String,
  pub category: String,
  pub stock: Option<i64>,
  pub rating: Option<f64>,
  pub weight: Option<f64>,
}

impl ProductDraft {
  /// Every validation failure, in dialog field order.
  pub fn errors(&self) -> Vec<CatalogError> {
    let mut errors = Vec::new();

    if self.title.trim().is_empty() {
      errors.push(CatalogError::validation("title", "title is required"));
    }
    match self.price {
      None => errors.push(CatalogError::validation("price", "price is required")),
      Some(p) if !p.is_finite() || p <= 0.0 => {
        errors.push(CatalogError::validation("price", "price must be positive"))
      }
      Some(_) => {}
    }
    if self.brand.trim().is_empty() {
      errors.push(CatalogError::validation("brand", "brand is required"));
    }
    if self.sku.trim().is_empty() {
      errors.push(CatalogError::validation("sku", "sku is required"));
    }
    if matches!(self.stock, Some(s) if s < 0) {
      errors.push(CatalogError::validation("stock", "stock cannot be negative"));
    }
    if matches!(self.rating, Some(r) if !(0.0..=5.0).contains(&r)) {
      errors.push(CatalogError::validation("rating", "rating must be between 0 and 5"));
    }
    if matches!(self.weight, Some(w) if !w.is_finite() || w <= 0.0) {
      errors.push(CatalogError::validation("weight", "weight must be positive"));
    }

    errors
  }

  /// First validation failure, if any.
  pub fn validate(&self) -> CatalogResult<()> {
    match self.errors().into_iter().next() {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }

  /// Build the full record sent to the server, filling in the defaults the
  /// dialog does not ask for.
  pub fn into_product(self) -> Product {
    use rand::Rng;

    let now = chrono::Utc::now().to_rfc3339();
    let mut rng = rand::rng();
    let non_empty_or = |s: String, default: &str| {
      if s.trim().is_empty() {
        default.to_string()
      } else {
        s.trim().to_string()
      }
    };

    Product {
      id: 0,
      title: self.title.trim().to_string(),
      description: self.description.trim().to_string(),
      price: self.price.unwrap_or_default(),
      discount_percentage: 0.0,
      rating: self.rating.unwrap_or(0.0),
      stock: self.stock.unwrap_or(0),
      brand: self.brand.trim().to_string(),
      category: non_empty_or(self.category, "General"),
      thumbnail: PLACEHOLDER_IMAGE.to_string(),
      images: vec![PLACEHOLDER_IMAGE.to_string()],
      sku: self.sku.trim().to_string(),
      weight: self.weight.unwrap_or(1.0),
      dimensions: Dimensions {
        width: 10.0,
        height: 10.0,
        depth: 10.0,
      },
      warranty_information: "6 months warranty".to_string(),
      shipping_information: "Ships in 2 business days".to_string(),
      availability_status: "In Stock".to_string(),
      reviews: Vec::new(),
      return_policy: "30 days return policy".to_string(),
      minimum_order_quantity: 1,
      meta: ProductMeta {
        created_at: now.clone(),
        updated_at: now,
        barcode: format!("BAR{}", rng.random_range(0..1_000_000)),
        qr_code: format!("QR{}", rng.random_range(0..1_000_000)),
      },
      tags: vec!["general".to_string()],
    }
  }
}

/// Login form input
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// Authenticated user as returned by the login endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthUser {
  pub id: u64,
  pub username: String,
  pub email: String,
  pub first_name: String,
  pub last_name: String,
  pub image: String,
  #[serde(alias = "accessToken")]
  pub token: String,
}

impl AuthUser {
  pub fn display_name(&self) -> &str {
    if self.first_name.is_empty() {
      &self.username
    } else {
      &self.first_name
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid_draft() -> ProductDraft {
    ProductDraft {
      title: "Desk Lamp".to_string(),
      price: Some(24.5),
      brand: "Lumen".to_string(),
      sku: "LMP-001".to_string(),
      ..Default::default()
    }
  }

  #[test]
  fn test_page_count() {
    assert_eq!(page_count(194, 20), 10);
    assert_eq!(page_count(200, 20), 10);
    assert_eq!(page_count(0, 20), 1);
    assert_eq!(page_count(5, 0), 1);
  }

  #[test]
  fn test_valid_draft_passes() {
    assert!(valid_draft().validate().is_ok());
  }

  #[test]
  fn test_negative_price_is_rejected() {
    let draft = ProductDraft {
      price: Some(-5.0),
      ..valid_draft()
    };
    let err = draft.validate().unwrap_err();
    assert_eq!(err.field(), Some("price"));
  }

  #[test]
  fn test_missing_required_fields_are_all_reported() {
    let draft = ProductDraft::default();
    let fields: Vec<String> = draft
      .errors()
      .iter()
      .filter_map(|e| e.field().map(String::from))
      .collect();
    assert_eq!(fields, vec!["title", "price", "brand", "sku"]);
  }

  #[test]
  fn test_optional_ranges() {
    let draft = ProductDraft {
      stock: Some(-1),
      rating: Some(5.5),
      weight: Some(0.0),
      ..valid_draft()
    };
    let fields: Vec<String> = draft
      .errors()
      .iter()
      .filter_map(|e| e.field().map(String::from))
      .collect();
    assert_eq!(fields, vec!["stock", "rating", "weight"]);
  }

  #[test]
  fn test_into_product_fills_defaults() {
    let product = valid_draft().into_product();
    assert_eq!(product.stock, 0);
    assert_eq!(product.rating, 0.0);
    assert_eq!(product.weight, 1.0);
    assert_eq!(product.category, "General");
    assert_eq!(product.thumbnail, PLACEHOLDER_IMAGE);
    assert_eq!(product.tags, vec!["general".to_string()]);
    assert_eq!(product.minimum_order_quantity, 1);
    assert!(product.meta.barcode.starts_with("BAR"));
    assert!(product.meta.qr_code.starts_with("QR"));
  }

  #[test]
  fn test_product_tolerates_missing_fields() {
    let product: Product =
      serde_json::from_str(r#"{"id": 7, "title": "Tea", "price": 3.5}"#).unwrap();
    assert_eq!(product.id, 7);
    assert_eq!(product.brand, "");
    assert!(product.tags.is_empty());
  }

  #[test]
  fn test_auth_user_accepts_access_token() {
    let user: AuthUser =
      serde_json::from_str(r#"{"id": 1, "username": "emilys", "accessToken": "abc"}"#).unwrap();
    assert_eq!(user.token, "abc");
    assert_eq!(user.display_name(), "emilys");
  }
}
