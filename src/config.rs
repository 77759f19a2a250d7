use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::convert::Infallible;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::RiskThresholds;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl FromStr for Environment {
    type Err = Infallible;

    /// Unrecognised names fall back to `Dev`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        })
    }
}

impl Environment {
    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,

    // Inputs
    pub pricing_config_path: PathBuf,
    pub takeoff_path: PathBuf,

    // Risk thresholds, overriding the pricing config when set
    pub risk_overrides: RiskOverrides,
}

/// Threshold overrides read from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskOverrides {
    pub low_margin_warning: Option<Decimal>,
    pub low_margin_error: Option<Decimal>,
    pub labor_heavy_ratio: Option<Decimal>,
    pub material_sensitive_ratio: Option<Decimal>,
}

impl RiskOverrides {
    pub fn apply(&self, base: RiskThresholds) -> RiskThresholds {
        RiskThresholds {
            low_margin_warning: self.low_margin_warning.unwrap_or(base.low_margin_warning),
            low_margin_error: self.low_margin_error.unwrap_or(base.low_margin_error),
            labor_heavy_ratio: self.labor_heavy_ratio.unwrap_or(base.labor_heavy_ratio),
            material_sensitive_ratio: self
                .material_sensitive_ratio
                .unwrap_or(base.material_sensitive_ratio),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = env::var("ENV")
            .unwrap_or_else(|_| "dev".to_string())
            .parse::<Environment>()
            .unwrap_or(Environment::Dev);

        // Inputs
        let pricing_config_path = env::var("PRICING_CONFIG_PATH")
            .context("PRICING_CONFIG_PATH must be set")?
            .into();
        let takeoff_path = env::var("TAKEOFF_PATH")
            .context("TAKEOFF_PATH must be set")?
            .into();

        // Risk thresholds
        let risk_overrides = RiskOverrides {
            low_margin_warning: decimal_var("RISK_LOW_MARGIN_WARNING")?,
            low_margin_error: decimal_var("RISK_LOW_MARGIN_ERROR")?,
            labor_heavy_ratio: decimal_var("RISK_LABOR_HEAVY_RATIO")?,
            material_sensitive_ratio: decimal_var("RISK_MATERIAL_SENSITIVE_RATIO")?,
        };

        Ok(Settings {
            env,
            pricing_config_path,
            takeoff_path,
            risk_overrides,
        })
    }
}

fn decimal_var(name: &str) -> Result<Option<Decimal>> {
    match env::var(name) {
        Ok(raw) => Decimal::from_str(raw.trim())
            .map(Some)
            .with_context(|| format!("{} must be a decimal number, got {:?}", name, raw)),
        Err(_) => Ok(None),
    }
}
