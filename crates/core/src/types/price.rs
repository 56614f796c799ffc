//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are exact decimals in the store currency. The store trades in a
//! single currency, so [`Price`] carries only the amount; the
//! [`CurrencyCode`] is supplied when formatting.

use core::iter::Sum;
use core::ops::{Add, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from an exact decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply a unit price by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Take a percentage of this amount (e.g. `10` for 10 %).
    #[must_use]
    pub fn percent(self, percent: Decimal) -> Self {
        Self((self.0 * percent / Decimal::ONE_HUNDRED).normalize())
    }

    /// Format for display in the given currency (e.g. `185.000₫`, `$19.99`).
    #[must_use]
    pub fn display(&self, currency: CurrencyCode) -> String {
        let dp = currency.minor_digits();
        let rounded = self.0.round_dp(dp).abs();
        let text = format!("{rounded:.prec$}", prec = dp as usize);
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

        let mut grouped = group_thousands(whole, currency.group_separator());
        if !fraction.is_empty() {
            grouped.push(currency.decimal_separator());
            grouped.push_str(fraction);
        }

        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };

        if currency.symbol_first() {
            format!("{sign}{}{grouped}", currency.symbol())
        } else {
            format!("{sign}{grouped}{}", currency.symbol())
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Insert a separator every three digits from the right.
fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// ISO 4217 currency codes the storefront can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    VND,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::VND => "₫",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// Digits after the decimal separator in display form.
    #[must_use]
    pub const fn minor_digits(self) -> u32 {
        match self {
            Self::VND => 0,
            Self::USD | Self::EUR => 2,
        }
    }

    const fn symbol_first(self) -> bool {
        matches!(self, Self::USD)
    }

    const fn group_separator(self) -> char {
        match self {
            Self::VND | Self::EUR => '.',
            Self::USD => ',',
        }
    }

    const fn decimal_separator(self) -> char {
        match self {
            Self::VND | Self::EUR => ',',
            Self::USD => '.',
        }
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let code = match self {
            Self::VND => "VND",
            Self::USD => "USD",
            Self::EUR => "EUR",
        };
        f.write_str(code)
    }
}

impl core::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VND" => Ok(Self::VND),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_units(185_000), Price::from_units(355_000).times(2)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_units(895_000));
    }

    #[test]
    fn test_percent() {
        let price = Price::from_units(1_200_000);
        assert_eq!(price.percent(Decimal::TEN), Price::from_units(120_000));
    }

    #[test]
    fn test_display_vnd() {
        assert_eq!(Price::from_units(185_000).display(CurrencyCode::VND), "185.000₫");
        assert_eq!(Price::from_units(1_250_000).display(CurrencyCode::VND), "1.250.000₫");
        assert_eq!(Price::ZERO.display(CurrencyCode::VND), "0₫");
    }

    #[test]
    fn test_display_usd() {
        let price = Price::new(Decimal::new(123_450, 2));
        assert_eq!(price.display(CurrencyCode::USD), "$1,234.50");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_units(30_000)).unwrap();
        assert_eq!(json, "\"30000\"");
        let parsed: Price = serde_json::from_str("\"199000\"").unwrap();
        assert_eq!(parsed, Price::from_units(199_000));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("vnd".parse::<CurrencyCode>().unwrap(), CurrencyCode::VND);
        assert!("GBP".parse::<CurrencyCode>().is_err());
    }
}
