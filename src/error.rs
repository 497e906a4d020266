use thiserror::Error;

/// Errors surfaced by catalog and auth operations.
///
/// `Clone` because a single in-flight request can be awaited by several
/// callers through the query cache, and each of them gets the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
  /// Transport failure: no response was received
  #[error("network error: {0}")]
  Network(String),

  /// The server answered with a non-2xx status or an unreadable body
  #[error("server error ({status}): {message}")]
  Server { status: u16, message: String },

  /// Input rejected before (or by) the server
  #[error("{field}: {message}")]
  Validation { field: String, message: String },
}

impl CatalogError {
  pub fn validation(field: &str, message: impl Into<String>) -> Self {
    Self::Validation {
      field: field.to_string(),
      message: message.into(),
    }
  }

  /// Field name for validation errors, used to place the message next to its input
  pub fn field(&self) -> Option<&str> {
    match self {
      Self::Validation { field, .. } => Some(field),
      _ => None,
    }
  }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validation_display_names_field() {
    let err = CatalogError::validation("price", "must be positive");
    assert_eq!(err.to_string(), "price: must be positive");
    assert_eq!(err.field(), Some("price"));
  }

  #[test]
  fn test_server_error_display() {
    let err = CatalogError::Server {
      status: 404,
      message: "Product with id '9999' not found".to_string(),
    };
    assert_eq!(
      err.to_string(),
      "server error (404): Product with id '9999' not found"
    );
    assert_eq!(err.field(), None);
  }
}
