//! Configuration
//!
//! Command-line and environment settings shared by the `larder` binary. Values fall back to
//! environment variables, which may come from a `.env` file.

use std::path::PathBuf;

use clap::Args;
use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;

use crate::{
    checkout::{CheckoutPricing, receipt::currency_from_code},
    storage::FileStorage,
    store::DEFAULT_STORAGE_KEY,
};

/// Where the cart is persisted.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Directory holding persisted cart entries
    #[arg(long, env = "LARDER_STORAGE_DIR", default_value = ".larder")]
    pub storage_dir: PathBuf,

    /// Key the cart is stored under
    #[arg(long, env = "LARDER_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,
}

impl StoreConfig {
    /// File storage rooted at the configured directory.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.storage_dir)
    }
}

/// Fees and currency used at checkout.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Currency for displayed amounts (GBP, USD, EUR)
    #[arg(long, env = "LARDER_CURRENCY", default_value = "USD", value_parser = parse_currency)]
    pub currency: &'static Currency,

    /// Flat delivery fee
    #[arg(long, env = "LARDER_DELIVERY_FEE", default_value = "2.99", value_parser = parse_fee)]
    pub delivery_fee: Decimal,

    /// Tax rate on the subtotal, as a fraction ("0.08") or percentage ("8%")
    #[arg(long, env = "LARDER_TAX_RATE", default_value = "0.08", value_parser = parse_tax_rate)]
    pub tax_rate: Percentage,
}

impl CheckoutConfig {
    /// Pricing built from the configured fee and tax rate.
    pub fn pricing(&self) -> CheckoutPricing {
        CheckoutPricing {
            delivery_fee: self.delivery_fee,
            tax_rate: self.tax_rate,
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

fn parse_currency(s: &str) -> Result<&'static Currency, String> {
    currency_from_code(s).ok_or_else(|| format!("unsupported currency: {s}"))
}

fn parse_fee(s: &str) -> Result<Decimal, String> {
    let fee = s
        .trim()
        .parse::<Decimal>()
        .map_err(|error| format!("invalid amount {s:?}: {error}"))?;

    if fee.is_sign_negative() {
        return Err(format!("fee cannot be negative: {s}"));
    }

    Ok(fee)
}

fn parse_tax_rate(s: &str) -> Result<Percentage, String> {
    let trimmed = s.trim();

    let fraction = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<f64>()
            .map(|value| value / 100.0)
    } else {
        trimmed.parse::<f64>()
    }
    .map_err(|error| format!("invalid tax rate {s:?}: {error}"))?;

    if !(0.0..=1.0).contains(&fraction) {
        return Err(format!("tax rate must be between 0 and 1: {s}"));
    }

    Ok(Percentage::from(fraction))
}
