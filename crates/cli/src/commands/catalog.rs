//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! threadline catalog list --category quan --price over-400k
//! threadline catalog show non-bucket-unisex
//! ```

use std::io::Write;

use clap::ValueEnum;
use threadline_core::catalog::{PriceBand, SortOrder};
use threadline_core::{Catalog, CurrencyCode, Product, ProductFilter};

/// Price band as typed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BandArg {
    #[value(name = "under-200k")]
    Under200k,
    #[value(name = "200k-400k")]
    From200kTo400k,
    #[value(name = "over-400k")]
    Over400k,
}

impl From<BandArg> for PriceBand {
    fn from(arg: BandArg) -> Self {
        match arg {
            BandArg::Under200k => Self::Under200k,
            BandArg::From200kTo400k => Self::From200kTo400k,
            BandArg::Over400k => Self::Over400k,
        }
    }
}

/// Sort order as typed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Featured,
    PriceAsc,
    PriceDesc,
    Name,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Featured => Self::Featured,
            SortArg::PriceAsc => Self::PriceAsc,
            SortArg::PriceDesc => Self::PriceDesc,
            SortArg::Name => Self::Name,
        }
    }
}

/// Which products `list` prints.
#[derive(Debug, Default)]
pub struct ListOptions {
    pub category: Option<String>,
    pub featured: bool,
    pub price: Option<PriceBand>,
    pub sort: Option<SortOrder>,
}

/// Print one row per matching product.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn list(
    catalog: &Catalog,
    options: &ListOptions,
    currency: CurrencyCode,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let products = options.category.as_deref().map_or_else(
        || catalog.products().iter().collect(),
        |slug| catalog.products_by_category(slug),
    );
    let products: Vec<&Product> = products
        .into_iter()
        .filter(|p| !options.featured || p.featured)
        .collect();

    let filter = ProductFilter {
        price: options.price,
        sort: options.sort,
    };
    let products = filter.apply(products);

    for product in &products {
        writeln!(
            out,
            "{:<28} {:>12}  {:<10} {}{}",
            product.slug,
            product.price.display(currency),
            product.category,
            product.name,
            if product.featured { " *" } else { "" },
        )?;
    }
    writeln!(out, "{} product(s)", products.len())
}

/// Print a product's details.
///
/// # Errors
///
/// Returns an error if the slug is unknown or writing fails.
pub fn show(
    catalog: &Catalog,
    slug: &str,
    currency: CurrencyCode,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = catalog.require_product(slug)?;

    writeln!(out, "{} ({})", product.name, product.id)?;
    writeln!(
        out,
        "Category: {}",
        catalog.category_name(&product.category)
    )?;
    match product.original_price {
        Some(original) => writeln!(
            out,
            "Price:    {} (was {})",
            product.price.display(currency),
            original.display(currency)
        )?,
        None => writeln!(out, "Price:    {}", product.price.display(currency))?,
    }
    if !product.sizes.is_empty() {
        writeln!(out, "Sizes:    {}", product.sizes.join(", "))?;
    }
    if !product.colors.is_empty() {
        let colors: Vec<&str> = product.colors.iter().map(|c| c.name.as_str()).collect();
        writeln!(out, "Colors:   {}", colors.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", product.description)?;
    Ok(())
}
