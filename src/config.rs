use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "prodpanel";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  pub list: ListConfig,
  pub search: SearchConfig,
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub url: String,
  /// Per-request timeout
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: "https://dummyjson.com".to_string(),
      timeout_secs: 10,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListConfig {
  /// Rows per page requested from the server
  pub page_size: u64,
  /// Freshness window of cached pages
  pub stale_secs: u64,
}

impl Default for ListConfig {
  fn default() -> Self {
    Self {
      page_size: 20,
      stale_secs: 300,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  /// Quiet period before a typed search is committed
  pub debounce_ms: u64,
  /// Minimum trimmed length for a debounced commit (Enter ignores it)
  pub min_chars: usize,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      debounce_ms: 500,
      min_chars: 2,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./prodpanel.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/prodpanel/config.yaml
  ///
  /// Unlike an explicit path, a missing file in the default locations is not
  /// an error: every setting has a usable default.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(format!("{}.yaml", APP_NAME));
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join(APP_NAME).join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    if config.list.page_size == 0 {
      return Err(eyre!("list.page_size must be at least 1"));
    }
    Ok(config)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.api.timeout_secs)
  }

  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.list.stale_secs)
  }

  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.search.debounce_ms)
  }

  /// Directory holding the durable store and the log file.
  pub fn data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join(APP_NAME))
  }

  /// Username to prefill the login form with.
  ///
  /// Reads PRODPANEL_USERNAME.
  pub fn default_username() -> Option<String> {
    std::env::var("PRODPANEL_USERNAME").ok()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_file_uses_defaults() {
    let config = Config::parse("{}").unwrap();
    assert_eq!(config.api.url, "https://dummyjson.com");
    assert_eq!(config.list.page_size, 20);
    assert_eq!(config.stale_time(), Duration::from_secs(300));
    assert_eq!(config.debounce(), Duration::from_millis(500));
    assert_eq!(config.search.min_chars, 2);
  }

  #[test]
  fn test_partial_override() {
    let config = Config::parse(
      "api:\n  url: http://localhost:3000\nlist:\n  page_size: 50\ntitle: Shop\n",
    )
    .unwrap();
    assert_eq!(config.api.url, "http://localhost:3000");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.list.page_size, 50);
    assert_eq!(config.list.stale_secs, 300);
    assert_eq!(config.title.as_deref(), Some("Shop"));
  }

  #[test]
  fn test_zero_page_size_is_rejected() {
    assert!(Config::parse("list:\n  page_size: 0\n").is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let err = Config::load(Some(Path::new("/nonexistent/prodpanel.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "search:\n  debounce_ms: 250\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.debounce(), Duration::from_millis(250));
  }
}
