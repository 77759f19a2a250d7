//! Pricing configuration bundle
//!
//! Services and trades are loaded together by an external store and handed
//! to the engine as plain data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::risk::RiskThresholds;
use super::services::{find_service, ServiceDefinition};
use super::trades::TradeDefinition;
use crate::error::{EstimateError, EstimateResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingConfig {
    pub id: String,
    pub name: String,
    pub default_margin: Decimal,
    #[serde(default)]
    pub services: Vec<ServiceDefinition>,
    #[serde(default)]
    pub trades: Vec<TradeDefinition>,
    #[serde(default)]
    pub risk_thresholds: RiskThresholds,
}

impl PricingConfig {
    pub fn from_json_str(json: &str) -> EstimateResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EstimateError::invalid_config(format!("malformed JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn service(&self, id_or_code: &str) -> Option<&ServiceDefinition> {
        find_service(&self.services, id_or_code)
    }

    pub fn trade(&self, id: &str) -> Option<&TradeDefinition> {
        self.trades.iter().find(|t| t.id == id)
    }

    /// Reject configuration that cannot be priced sensibly.
    ///
    /// Consumption rules naming unknown services are allowed: they are skipped
    /// at estimate time.
    pub fn validate(&self) -> EstimateResult<()> {
        let mut errors = Vec::new();

        if !in_unit_range(self.default_margin) {
            errors.push(format!("default_margin {} is outside [0, 1]", self.default_margin));
        }

        for (i, service) in self.services.iter().enumerate() {
            if self.services[..i].iter().any(|s| s.id == service.id) {
                errors.push(format!("duplicate service id {}", service.id));
            }
            errors.extend(service.validation_errors());
        }

        for (i, trade) in self.trades.iter().enumerate() {
            if self.trades[..i].iter().any(|t| t.id == trade.id) {
                errors.push(format!("duplicate trade id {}", trade.id));
            }
            if !in_unit_range(trade.default_margin) {
                errors.push(format!(
                    "trade {} default_margin {} is outside [0, 1]",
                    trade.id, trade.default_margin
                ));
            }
            if trade.mobilization_cost < Decimal::ZERO {
                errors.push(format!("trade {} has negative mobilization_cost", trade.id));
            }
            for rule in &trade.consumes {
                if rule.waste_factor() < Decimal::ZERO {
                    errors.push(format!(
                        "trade {} rule for {} has negative waste_factor",
                        trade.id, rule.service_id
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(EstimateError::invalid_config(errors.join("; ")))
        }
    }
}

fn in_unit_range(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}
