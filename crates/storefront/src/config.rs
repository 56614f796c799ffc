//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL; `https` enables secure cookies
//!   (default: `http://localhost:3000`)
//! - `STOREFRONT_CURRENCY` - Display currency (default: VND)
//! - `STOREFRONT_FREE_SHIPPING_THRESHOLD` - Subtotal that ships free (default: 300000)
//! - `STOREFRONT_FLAT_SHIPPING_FEE` - Fee below the threshold (default: 30000)
//! - `STOREFRONT_DISCOUNT_THRESHOLD` - Enables the volume discount above this subtotal
//! - `STOREFRONT_DISCOUNT_PERCENT` - Discount percentage (default: 10)
//! - `STOREFRONT_ORDER_LATENCY_MS` - Simulated order submission delay (default: 1500)
//! - `STOREFRONT_DECLINE_ORDERS` - Make the order gateway decline every order (default: false)
//! - `STOREFRONT_BANK_NAME` - Bank shown for transfers (default: VCB - Vietcombank)
//! - `STOREFRONT_BANK_ACCOUNT_NUMBER` - Account to transfer to (default: 1234567890)
//! - `STOREFRONT_BANK_ACCOUNT_HOLDER` - Account holder name (default: CÔNG TY TNHH XYZ)
//! - `STOREFRONT_BANK_TRANSFER_REFERENCE` - Transfer description to use
//!   (default: Thanh toan don hang online)
//! - `STOREFRONT_LOG_FORMAT` - `text` or `json` log lines (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use threadline_core::{CurrencyCode, DiscountRule, Price, PricingPolicy};
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// Shipping and discount rules
    pub pricing: PricingPolicy,
    /// Simulated order gateway settings
    pub orders: OrderGatewayConfig,
    /// Account shown to shoppers paying by bank transfer
    pub bank_transfer: BankTransferDetails,
    /// Log line format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Where and how to pay when the shopper picks bank transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankTransferDetails {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    /// Text to put in the transfer description.
    pub transfer_reference: String,
}

impl Default for BankTransferDetails {
    fn default() -> Self {
        Self {
            bank_name: "VCB - Vietcombank".to_string(),
            account_number: "1234567890".to_string(),
            account_holder: "CÔNG TY TNHH XYZ".to_string(),
            transfer_reference: "Thanh toan don hang online".to_string(),
        }
    }
}

/// Format of log lines written by the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected text or json, got {other}")),
        }
    }
}

/// Settings for the simulated order gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderGatewayConfig {
    /// How long a submission takes.
    pub latency: Duration,
    /// Decline every order instead of accepting it.
    pub decline: bool,
}

impl Default for OrderGatewayConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1500),
            decline: false,
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            currency: CurrencyCode::default(),
            pricing: PricingPolicy::default(),
            orders: OrderGatewayConfig::default(),
            bank_transfer: BankTransferDetails::default(),
            log_format: LogFormat::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env.parse_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parse_or("STOREFRONT_PORT", "3000")?;
        let base_url = env.or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;
        let currency = env.parse_or("STOREFRONT_CURRENCY", "VND")?;

        let pricing = pricing_from_env(&env)?;

        let latency_ms: u64 = env.parse_or("STOREFRONT_ORDER_LATENCY_MS", "1500")?;
        let orders = OrderGatewayConfig {
            latency: Duration::from_millis(latency_ms),
            decline: env.parse_or("STOREFRONT_DECLINE_ORDERS", "false")?,
        };

        let bank = BankTransferDetails::default();
        let bank_transfer = BankTransferDetails {
            bank_name: env.or_default("STOREFRONT_BANK_NAME", &bank.bank_name),
            account_number: env.or_default("STOREFRONT_BANK_ACCOUNT_NUMBER", &bank.account_number),
            account_holder: env.or_default("STOREFRONT_BANK_ACCOUNT_HOLDER", &bank.account_holder),
            transfer_reference: env
                .or_default("STOREFRONT_BANK_TRANSFER_REFERENCE", &bank.transfer_reference),
        };
        let log_format = env.parse_or("STOREFRONT_LOG_FORMAT", "text")?;

        Ok(Self {
            host,
            port,
            base_url,
            currency,
            pricing,
            orders,
            bank_transfer,
            log_format,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn pricing_from_env<F>(env: &Env<F>) -> Result<PricingPolicy, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let free_shipping: Decimal = env.parse_or("STOREFRONT_FREE_SHIPPING_THRESHOLD", "300000")?;
    let flat_fee: Decimal = env.parse_or("STOREFRONT_FLAT_SHIPPING_FEE", "30000")?;

    let mut policy = PricingPolicy {
        free_shipping_threshold: Price::new(free_shipping),
        flat_shipping_fee: Price::new(flat_fee),
        discount: None,
    };

    if let Some(threshold) = env.parse_optional::<Decimal>("STOREFRONT_DISCOUNT_THRESHOLD")? {
        let percent: Decimal = env.parse_or("STOREFRONT_DISCOUNT_PERCENT", "10")?;
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_DISCOUNT_PERCENT".to_string(),
                format!("{percent} is outside 0..=100"),
            ));
        }
        policy = policy.with_discount(DiscountRule {
            threshold: Price::new(threshold),
            percent,
        });
    }

    Ok(policy)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with typed parsing.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        parse_value(key, self.or_default(key, default).trim())
    }

    /// Parse a variable that may be unset.
    fn parse_optional<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(key)
            .map(|value| parse_value(key, value.trim()))
            .transpose()
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
