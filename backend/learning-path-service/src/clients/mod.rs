//! Source client implementations
//!
//! An HTTP client is used for every source with a configured search
//! endpoint; the remaining sources are served from the offline catalog.

mod catalog;
mod http;

pub use catalog::{load_catalog, CatalogSourceClient};
pub use http::HttpSourceClient;

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Resource, Source};
use crate::services::fetch::SourceClient;

/// Build one client per source from configuration
pub fn build_clients(config: &Config) -> Result<Vec<Arc<dyn SourceClient>>> {
    let catalog: Vec<Resource> = match &config.sources.catalog_path {
        Some(path) => load_catalog(path)?,
        None => Vec::new(),
    };

    let mut clients: Vec<Arc<dyn SourceClient>> = Vec::with_capacity(Source::ALL.len());
    for source in Source::ALL {
        match config.sources.search_url(source) {
            Some(url) => {
                let client = HttpSourceClient::new(source, url, config.fetch.source_timeout())
                    .map_err(|e| AppError::Configuration(e.to_string()))?;
                info!(source = %source, url, "Using HTTP search endpoint");
                clients.push(Arc::new(client));
            }
            None => {
                let client = CatalogSourceClient::new(source, &catalog);
                if client.is_empty() {
                    warn!(source = %source, "No endpoint and no catalog entries for source");
                }
                clients.push(Arc::new(client));
            }
        }
    }

    Ok(clients)
}
