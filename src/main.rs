mod api;
mod app;
mod auth;
mod cache;
mod config;
mod error;
mod event;
mod logging;
mod query;
mod state;
mod storage;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prodpanel")]
#[command(about = "A terminal admin panel for a product catalog API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/prodpanel/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base URL of the catalog API
  #[arg(long)]
  api_url: Option<String>,

  /// Rows per page
  #[arg(long)]
  page_size: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line wins over the config file
  if let Some(url) = args.api_url {
    config.api.url = url;
  }
  if let Some(page_size) = args.page_size {
    if page_size == 0 {
      return Err(eyre!("--page-size must be at least 1"));
    }
    config.list.page_size = page_size;
  }

  let _log_guard = logging::init(&config::Config::data_dir()?)?;
  tracing::info!(api = %config.api.url, page_size = config.list.page_size, "starting");

  let stores = storage::Stores::open()?;

  let mut app = app::App::new(config, stores)?;
  app.run().await?;

  tracing::info!("exiting");
  Ok(())
}
