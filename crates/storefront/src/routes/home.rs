//! Home page route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use threadline_core::Category;
use tracing::instrument;

use crate::routes::products::ProductSummary;
use crate::state::AppState;

/// Home page data.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub categories: Vec<Category>,
    pub featured: Vec<ProductSummary>,
}

/// Display the home page: categories and featured products.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Json<HomePage> {
    let catalog = state.catalog();
    let featured = catalog.featured_products();

    Json(HomePage {
        categories: catalog.categories().to_vec(),
        featured: ProductSummary::list(&featured, state.config().currency),
    })
}
