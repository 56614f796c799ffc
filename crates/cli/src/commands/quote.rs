//! Offline cart quotes.
//!
//! Prices a set of lines with the same policy the storefront would use,
//! including the `STOREFRONT_*` pricing variables from the environment.
//!
//! # Usage
//!
//! ```bash
//! threadline quote -i ao-thun-co-tron-don-gian:M:Đen:2 -i non-bucket-unisex:Freesize:Kem
//! ```

use std::io::Write;

use rust_decimal::Decimal;
use thiserror::Error;
use threadline_core::{
    Cart, CartAction, CartError, CartItem, Catalog, CatalogError, CurrencyCode, DiscountRule,
    Price, PricingPolicy, VariantChoice,
};

/// Errors that can occur while building a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The line spec is not `slug[:size[:color[:quantity]]]`.
    #[error("Invalid item '{0}': expected slug:size:color:quantity")]
    InvalidItem(String),

    /// Unknown product slug.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Missing or unknown size or color.
    #[error("{spec}: {source}")]
    Variant {
        spec: String,
        #[source]
        source: CartError,
    },

    /// Writing the output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One parsed `--item` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub slug: String,
    pub variant: VariantChoice,
    pub quantity: i64,
}

impl std::str::FromStr for ItemSpec {
    type Err = QuoteError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut parts = spec.split(':').map(str::trim);
        let slug = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| QuoteError::InvalidItem(spec.to_string()))?;
        let non_empty = |part: Option<&str>| part.filter(|s| !s.is_empty()).map(str::to_owned);
        let size = non_empty(parts.next());
        let color = non_empty(parts.next());
        let quantity = match parts.next().filter(|s| !s.is_empty()) {
            Some(qty) => qty
                .parse()
                .map_err(|_| QuoteError::InvalidItem(spec.to_string()))?,
            None => 1,
        };
        if parts.next().is_some() {
            return Err(QuoteError::InvalidItem(spec.to_string()));
        }

        Ok(Self {
            slug: slug.to_string(),
            variant: VariantChoice { size, color },
            quantity,
        })
    }
}

/// Apply command-line discount flags on top of the configured policy.
#[must_use]
pub fn policy(base: PricingPolicy, threshold: Option<i64>, percent: u8) -> PricingPolicy {
    match threshold {
        Some(threshold) => base.with_discount(DiscountRule {
            threshold: Price::from_units(threshold),
            percent: Decimal::from(percent),
        }),
        None => base,
    }
}

/// Build a cart from `specs`, every line selected.
///
/// Repeating a variant adds to its quantity, as on the product page.
///
/// # Errors
///
/// Returns an error for a malformed spec, an unknown slug or an invalid
/// variant.
pub fn build_cart(catalog: &Catalog, specs: &[String]) -> Result<Cart, QuoteError> {
    let mut cart = Cart::new();
    for spec in specs {
        let item: ItemSpec = spec.parse()?;
        let product = catalog.require_product(&item.slug)?;
        let line = CartItem::from_product(product, &item.variant, item.quantity).map_err(
            |source| QuoteError::Variant {
                spec: spec.clone(),
                source,
            },
        )?;
        cart.apply(CartAction::Add(line))
            .map_err(|source| QuoteError::Variant {
                spec: spec.clone(),
                source,
            })?;
    }
    Ok(cart)
}

/// Print the lines and the price breakdown.
///
/// # Errors
///
/// Returns an error if the cart cannot be built or writing fails.
pub fn run(
    catalog: &Catalog,
    policy: &PricingPolicy,
    currency: CurrencyCode,
    specs: &[String],
    out: &mut impl Write,
) -> Result<(), QuoteError> {
    let cart = build_cart(catalog, specs)?;
    let quote = cart.quote(policy);
    tracing::debug!(lines = quote.line_count, units = quote.unit_count, "Quoted cart");

    for item in cart.items() {
        let variant = [item.size.as_str(), item.color.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" / ");
        writeln!(
            out,
            "{:>3} × {:<32} {:<16} {:>12}",
            item.quantity,
            item.name,
            variant,
            item.line_total().display(currency)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Subtotal: {:>14}", quote.subtotal.display(currency))?;
    if !quote.discount.is_zero() {
        writeln!(out, "Discount: {:>14}", format!("-{}", quote.discount.display(currency)))?;
    }
    let shipping = if quote.free_shipping() {
        "free".to_string()
    } else {
        quote.shipping_fee.display(currency)
    };
    writeln!(out, "Shipping: {shipping:>14}")?;
    writeln!(out, "Total:    {:>14}", quote.total.display(currency))?;
    Ok(())
}
