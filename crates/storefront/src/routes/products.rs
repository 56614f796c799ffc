//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use threadline_core::catalog::Color;
use threadline_core::reviews::Review;
use threadline_core::{Catalog, CurrencyCode, Price, Product, ProductId, ReviewSummary};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product card data for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub price: Price,
    pub price_display: String,
    pub original_price: Option<Price>,
    pub discount: Option<u8>,
    pub image: Option<String>,
    pub category: String,
    pub featured: bool,
}

impl ProductSummary {
    /// Build a card for `product`, formatting prices in `currency`.
    #[must_use]
    pub fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.clone(),
            slug: product.slug.clone(),
            name: product.name.clone(),
            price: product.price,
            price_display: product.price.display(currency),
            original_price: product.original_price,
            discount: product.discount,
            image: product.primary_image().map(str::to_owned),
            category: product.category.clone(),
            featured: product.featured,
        }
    }

    /// Build cards for a listing.
    #[must_use]
    pub fn list(products: &[&Product], currency: CurrencyCode) -> Vec<Self> {
        products.iter().map(|p| Self::new(p, currency)).collect()
    }
}

/// Product page data.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub summary: ProductSummary,
    pub category_name: String,
    pub description: String,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<Color>,
    pub related: Vec<ProductSummary>,
    pub rating: Option<ReviewSummary>,
    pub reviews: Vec<Review>,
}

impl ProductDetail {
    fn new(state: &AppState, product: &Product) -> Self {
        let catalog: &Catalog = state.catalog();
        let currency = state.config().currency;
        let related = catalog.related_products(product, Catalog::RELATED_LIMIT);

        Self {
            summary: ProductSummary::new(product, currency),
            category_name: catalog.category_name(&product.category).to_string(),
            description: product.description.clone(),
            images: product.images.clone(),
            tags: product.tags.clone(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            related: ProductSummary::list(&related, currency),
            rating: state.reviews().summary(&product.slug),
            reviews: state
                .reviews()
                .for_product(&product.slug)
                .map(|r| r.reviews.clone())
                .unwrap_or_default(),
        }
    }
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let product = state
        .catalog()
        .product_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    Ok(Json(ProductDetail::new(&state, product)))
}
