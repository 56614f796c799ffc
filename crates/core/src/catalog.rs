//! Product catalog.
//!
//! The catalog is loaded once from a JSON fixture and never mutated. Lookups
//! are linear scans; the catalog holds a handful of products.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Errors raised while loading or querying the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The fixture is not valid JSON for the catalog schema.
    #[error("invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share a slug.
    #[error("duplicate product slug: {0}")]
    DuplicateSlug(String),

    /// Two products share an ID.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// No product has the requested slug.
    #[error("product not found: {0}")]
    ProductNotFound(String),
}

/// A color option offered for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Display name, also used as the cart line's color.
    pub name: String,
    /// Hex swatch code, e.g. `#000000`.
    pub code: String,
}

/// A product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Discount percentage shown on the badge, e.g. `26` for -26 %.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
    pub images: Vec<String>,
    /// Category slug.
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// First image, used as the cart thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product is offered in `size`.
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Whether the product is offered in the color named `color`.
    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c.name == color)
    }
}

/// A browsable category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

/// Price bands from the category filter sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBand {
    /// Below 200,000.
    #[serde(rename = "under_200k")]
    Under200k,
    /// 200,000 to 400,000 inclusive.
    #[serde(rename = "200k_400k")]
    From200kTo400k,
    /// Above 400,000.
    #[serde(rename = "over_400k")]
    Over400k,
}

impl PriceBand {
    /// Whether `price` falls inside this band.
    #[must_use]
    pub fn contains(self, price: Price) -> bool {
        let low = Price::from_units(200_000);
        let high = Price::from_units(400_000);
        match self {
            Self::Under200k => price < low,
            Self::From200kTo400k => price >= low && price <= high,
            Self::Over400k => price > high,
        }
    }
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Featured products first, then catalog order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Name,
}

/// Filter and ordering applied to a product listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub price: Option<PriceBand>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

impl ProductFilter {
    /// Filter and sort `products`. Sorting is stable.
    #[must_use]
    pub fn apply<'a>(&self, products: Vec<&'a Product>) -> Vec<&'a Product> {
        let mut products: Vec<&Product> = products
            .into_iter()
            .filter(|p| self.price.is_none_or(|band| band.contains(p.price)))
            .collect();

        match self.sort.unwrap_or_default() {
            SortOrder::Featured => products.sort_by_key(|p| !p.featured),
            SortOrder::PriceAsc => products.sort_by_key(|p| p.price),
            SortOrder::PriceDesc => products.sort_by_key(|p| std::cmp::Reverse(p.price)),
            SortOrder::Name => products.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        products
    }
}

/// Fixture file layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// The static product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// Number of related products shown on a product page.
    pub const RELATED_LIMIT: usize = 4;

    /// Build a catalog, rejecting duplicate IDs or slugs.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] or [`CatalogError::DuplicateSlug`].
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        for product in &products {
            if !ids.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if !slugs.insert(product.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(product.slug.clone()));
            }
        }
        Ok(Self {
            categories,
            products,
        })
    }

    /// Parse a catalog fixture of the form `{ "categories": [..], "products": [..] }`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON, or a duplicate error.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.categories, file.products)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All categories.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Find a product by slug.
    #[must_use]
    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// Find a product by slug or fail with [`CatalogError::ProductNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product matches.
    pub fn require_product(&self, slug: &str) -> Result<&Product, CatalogError> {
        self.product_by_slug(slug)
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_owned()))
    }

    /// Find a product by ID.
    #[must_use]
    pub fn product_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products in a category, in catalog order.
    #[must_use]
    pub fn products_by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Products flagged as featured.
    #[must_use]
    pub fn featured_products(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.featured).collect()
    }

    /// Up to `limit` other products from the same category.
    #[must_use]
    pub fn related_products(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }

    /// The category with `slug`, if it is known.
    #[must_use]
    pub fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Display name for a category slug, falling back to the slug itself.
    #[must_use]
    pub fn category_name<'a>(&'a self, slug: &'a str) -> &'a str {
        self.category(slug).map_or(slug, |c| c.name.as_str())
    }
}
