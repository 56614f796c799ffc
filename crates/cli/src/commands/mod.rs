//! CLI subcommands.

pub mod catalog;
pub mod quote;

use std::path::Path;

use threadline_core::Catalog;

/// Load the catalog from `path`, or the storefront's built-in fixture.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid catalog.
pub async fn load_catalog(path: Option<&Path>) -> Result<Catalog, Box<dyn std::error::Error>> {
    let catalog = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading catalog from file");
            let json = tokio::fs::read_to_string(path).await?;
            Catalog::from_json(&json)?
        }
        None => Catalog::from_json(threadline_storefront::state::CATALOG_JSON)?,
    };

    tracing::debug!(products = catalog.products().len(), "Catalog loaded");
    Ok(catalog)
}

