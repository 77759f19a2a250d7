use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Kind of structural risk detected on a bid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlagType {
    LowMargin,
    LaborHeavy,
    MaterialSensitive,
    BelowMinimum,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// Advisory finding about a bid's cost structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskFlag {
    #[serde(rename = "type")]
    pub flag_type: RiskFlagType,
    pub message: String,
    pub severity: Severity,
}

/// Cut-offs used when assessing a bid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskThresholds {
    /// Margins below this get a warning
    pub low_margin_warning: Decimal,
    /// Margins below this get an error
    pub low_margin_error: Decimal,
    pub labor_heavy_ratio: Decimal,
    pub material_sensitive_ratio: Decimal,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_margin_warning: dec!(0.15),
            low_margin_error: dec!(0.10),
            labor_heavy_ratio: dec!(0.70),
            material_sensitive_ratio: dec!(0.40),
        }
    }
}
