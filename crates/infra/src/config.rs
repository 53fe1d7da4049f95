//! Application configuration.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `werkbank.toml` in the working directory (optional)
//! 3. `WERKBANK__*` environment variables, e.g. `WERKBANK__DATA_DIR` or
//!    `WERKBANK__BILLING__PAYMENT_TERMS_DAYS` (a `.env` file is honoured)

use std::path::{Path, PathBuf};

use config::{Config as Cfg, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use werkbank_dashboard::DEFAULT_COLLECTION_WINDOW_DAYS;
use werkbank_observability::LogConfig;

pub const DEFAULT_CONFIG_FILE: &str = "werkbank.toml";
pub const ENV_PREFIX: &str = "WERKBANK";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the `<collection>.json` files.
    pub data_dir: PathBuf,
    pub billing: BillingConfig,
    pub dashboard: DashboardConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// VAT rate in percent for new documents that do not name one.
    pub default_tax_rate: Decimal,
    /// Days between invoice date and due date when none is given.
    pub payment_terms_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub collection_window_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            billing: BillingConfig::default(),
            dashboard: DashboardConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_tax_rate: Decimal::from(19),
            payment_terms_days: 14,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            collection_window_days: DEFAULT_COLLECTION_WINDOW_DAYS,
        }
    }
}

impl AppConfig {
    /// Load from `.env`, `werkbank.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load from an explicit config file (missing is fine) plus the environment.
    pub fn load_from(file: &Path) -> Result<Self, ConfigError> {
        let config = Cfg::builder()
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.billing.default_tax_rate;
        if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
            return Err(ConfigError::Invalid(format!(
                "billing.default_tax_rate must be within 0..=100 (got {rate})"
            )));
        }
        if self.billing.payment_terms_days < 0 {
            return Err(ConfigError::Invalid(
                "billing.payment_terms_days must not be negative".to_string(),
            ));
        }
        if self.dashboard.collection_window_days <= 0 {
            return Err(ConfigError::Invalid(
                "dashboard.collection_window_days must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
