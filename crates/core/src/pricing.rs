//! Order pricing.
//!
//! A [`PricingPolicy`] turns the selected cart lines into a [`Quote`]:
//!
//! ```text
//! subtotal = Σ price × quantity   (selected lines only)
//! discount = percent × subtotal   if a discount rule is set and subtotal > threshold
//! shipping = 0                    if subtotal ≥ free_shipping_threshold
//!          = flat_shipping_fee    otherwise
//! total    = subtotal − discount + shipping
//! ```
//!
//! Quotes are recomputed on every read; nothing is cached.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::types::{LineId, Price};

/// Percentage discount applied above a subtotal threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRule {
    /// The discount applies when the subtotal is strictly greater than this.
    pub threshold: Price,
    /// Percentage of the subtotal, e.g. `10`.
    pub percent: Decimal,
}

impl DiscountRule {
    /// 10 % off subtotals above 1,000,000.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            threshold: Price::from_units(1_000_000),
            percent: Decimal::TEN,
        }
    }
}

/// Shipping and discount rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Price,
    /// Fee charged below the free-shipping threshold.
    pub flat_shipping_fee: Price,
    /// Optional volume discount. Off unless configured.
    pub discount: Option<DiscountRule>,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Price::from_units(300_000),
            flat_shipping_fee: Price::from_units(30_000),
            discount: None,
        }
    }
}

/// Priced breakdown of a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub subtotal: Price,
    pub discount: Price,
    pub shipping_fee: Price,
    pub total: Price,
    /// Number of lines priced.
    pub line_count: usize,
    /// Units across the priced lines.
    pub unit_count: u64,
}

impl Quote {
    /// Whether shipping is free for this quote.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping_fee.is_zero()
    }
}

impl PricingPolicy {
    /// Enable or replace the discount rule.
    #[must_use]
    pub fn with_discount(mut self, rule: DiscountRule) -> Self {
        self.discount = Some(rule);
        self
    }

    /// Price the lines of `items` whose IDs are in `selection`.
    #[must_use]
    pub fn quote(&self, items: &[CartItem], selection: &BTreeSet<LineId>) -> Quote {
        self.quote_lines(items.iter().filter(|item| selection.contains(&item.id)))
    }

    /// Price every line yielded by `lines`.
    #[must_use]
    pub fn quote_lines<'a>(&self, lines: impl IntoIterator<Item = &'a CartItem>) -> Quote {
        let mut subtotal = Price::ZERO;
        let mut line_count = 0;
        let mut unit_count = 0;
        for line in lines {
            subtotal = subtotal + line.line_total();
            line_count += 1;
            unit_count += u64::from(line.quantity);
        }

        let discount = self.discount_for(subtotal);
        let shipping_fee = self.shipping_fee_for(subtotal);

        Quote {
            subtotal,
            discount,
            shipping_fee,
            total: subtotal - discount + shipping_fee,
            line_count,
            unit_count,
        }
    }

    /// Discount owed on `subtotal`.
    #[must_use]
    pub fn discount_for(&self, subtotal: Price) -> Price {
        match self.discount {
            Some(rule) if subtotal > rule.threshold => subtotal.percent(rule.percent),
            _ => Price::ZERO,
        }
    }

    /// Shipping fee owed on `subtotal`.
    #[must_use]
    pub fn shipping_fee_for(&self, subtotal: Price) -> Price {
        if subtotal >= self.free_shipping_threshold {
            Price::ZERO
        } else {
            self.flat_shipping_fee
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn item(id: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id: LineId::new(id),
            product_id: ProductId::new(id),
            name: format!("product {id}"),
            price: Price::from_units(price),
            quantity,
            size: "M".into(),
            color: "Đen".into(),
            image: None,
        }
    }

    fn all(items: &[CartItem]) -> BTreeSet<LineId> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_free_shipping_scenario() {
        let items = [item("1", 185_000, 1), item("3", 355_000, 2)];
        let quote = PricingPolicy::default().quote(&items, &all(&items));

        assert_eq!(quote.subtotal, Price::from_units(895_000));
        assert_eq!(quote.shipping_fee, Price::ZERO);
        assert_eq!(quote.discount, Price::ZERO);
        assert_eq!(quote.total, Price::from_units(895_000));
        assert_eq!(quote.unit_count, 3);
        assert!(quote.free_shipping());
    }

    #[test]
    fn test_flat_fee_scenario() {
        let items = [item("9", 199_000, 1)];
        let quote = PricingPolicy::default().quote(&items, &all(&items));

        assert_eq!(quote.subtotal, Price::from_units(199_000));
        assert_eq!(quote.shipping_fee, Price::from_units(30_000));
        assert_eq!(quote.total, Price::from_units(229_000));
    }

    #[test]
    fn test_unselected_lines_contribute_nothing() {
        let items = [item("1", 185_000, 1), item("3", 355_000, 2)];
        let selection: BTreeSet<LineId> = [LineId::new("1")].into_iter().collect();
        let quote = PricingPolicy::default().quote(&items, &selection);

        assert_eq!(quote.subtotal, Price::from_units(185_000));
        assert_eq!(quote.line_count, 1);
        assert_eq!(quote.shipping_fee, Price::from_units(30_000));
    }

    #[test]
    fn test_empty_selection_still_charges_shipping() {
        let items = [item("1", 185_000, 1)];
        let quote = PricingPolicy::default().quote(&items, &BTreeSet::new());
        assert_eq!(quote.subtotal, Price::ZERO);
        assert_eq!(quote.total, Price::from_units(30_000));
    }

    #[test]
    fn test_shipping_threshold_is_inclusive() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.shipping_fee_for(Price::from_units(300_000)), Price::ZERO);
        assert_eq!(
            policy.shipping_fee_for(Price::from_units(299_999)),
            Price::from_units(30_000)
        );
    }

    #[test]
    fn test_discount_disabled_by_default() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.discount_for(Price::from_units(5_000_000)), Price::ZERO);
    }

    #[test]
    fn test_discount_strictly_above_threshold() {
        let policy = PricingPolicy::default().with_discount(DiscountRule::standard());
        assert_eq!(policy.discount_for(Price::from_units(1_000_000)), Price::ZERO);
        assert_eq!(
            policy.discount_for(Price::from_units(1_200_000)),
            Price::from_units(120_000)
        );

        let items = [item("1", 600_000, 2)];
        let quote = policy.quote(&items, &all(&items));
        assert_eq!(quote.discount, Price::from_units(120_000));
        assert_eq!(quote.total, Price::from_units(1_080_000));
    }

    #[test]
    fn test_total_never_negative() {
        let policy = PricingPolicy::default().with_discount(DiscountRule::standard());
        for (price, qty) in [(0, 1), (1, 1), (299_999, 1), (1_000_001, 3), (50_000, 40)] {
            let items = [item("x", price, qty)];
            let quote = policy.quote(&items, &all(&items));
            assert!(quote.total >= Price::ZERO);
            assert_eq!(quote.total, quote.subtotal - quote.discount + quote.shipping_fee);
        }
    }
}
