//! Category listing route handler.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use threadline_core::ProductFilter;
use tracing::instrument;

use crate::routes::products::ProductSummary;
use crate::state::AppState;

/// Category page data.
#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub slug: String,
    pub name: String,
    pub filter: ProductFilter,
    pub products: Vec<ProductSummary>,
}

/// Display a category listing, optionally filtered by price band and sorted.
///
/// Unknown slugs are not an error: they show the slug as the name and an
/// empty listing.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(filter): Query<ProductFilter>,
) -> Json<CategoryPage> {
    let catalog = state.catalog();
    let products = filter.apply(catalog.products_by_category(&slug));

    Json(CategoryPage {
        name: catalog.category_name(&slug).to_string(),
        filter,
        products: ProductSummary::list(&products, state.config().currency),
        slug,
    })
}
