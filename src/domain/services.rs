//! Service (priced unit of work) definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a service's quantity is interpreted when pricing it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    /// Square feet of surface, produced at `production_rate` sq ft per hour
    Area,
    /// Linear feet, produced at `production_rate` ft per hour
    Linear,
    /// Discrete units (stalls, symbols), produced at `production_rate` per hour
    Count,
    /// Quantity is crew hours
    Hourly,
    /// Lump-sum job with a nominal single hour of labor
    Fixed,
}

impl PricingModel {
    /// Display unit for line items priced under this model.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Area => "sq ft",
            Self::Linear => "linear ft",
            Self::Count => "ea",
            Self::Hourly => "hr",
            Self::Fixed => "ea",
        }
    }
}

/// Immutable cost-rule reference data for one service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub id: String,
    /// Short alias (e.g. "SC-2") accepted wherever an id is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    pub pricing_model: PricingModel,
    pub production_rate: Decimal,
    pub crew_size: Decimal,
    pub hourly_rate: Decimal,
    #[serde(default = "default_factor")]
    pub labor_burden_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_cost_per_unit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_waste_factor: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_cost_fixed: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_cost_hourly: Option<Decimal>,
    #[serde(default)]
    pub minimum_charge: Decimal,
    /// Trade this service is usually sold under, for grouping in pickers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<String>,
}

fn default_factor() -> Decimal {
    Decimal::ONE
}

impl ServiceDefinition {
    pub fn unit(&self) -> &'static str {
        self.pricing_model.unit()
    }

    /// Problems that would make this service price nonsensically.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let uses_rate = matches!(
            self.pricing_model,
            PricingModel::Area | PricingModel::Linear | PricingModel::Count
        );
        if uses_rate && self.production_rate <= Decimal::ZERO {
            errors.push(format!(
                "service {} has non-positive production_rate {}",
                self.id, self.production_rate
            ));
        }

        let non_negative = [
            ("crew_size", Some(self.crew_size)),
            ("hourly_rate", Some(self.hourly_rate)),
            ("labor_burden_rate", Some(self.labor_burden_rate)),
            ("material_cost_per_unit", self.material_cost_per_unit),
            ("material_waste_factor", self.material_waste_factor),
            ("equipment_cost_fixed", self.equipment_cost_fixed),
            ("equipment_cost_hourly", self.equipment_cost_hourly),
            ("minimum_charge", Some(self.minimum_charge)),
        ];
        for (field, value) in non_negative {
            if let Some(v) = value {
                if v < Decimal::ZERO {
                    errors.push(format!("service {} has negative {} {}", self.id, field, v));
                }
            }
        }

        errors
    }
}

/// Find a service by id or code. `None` is a normal outcome, not an error.
pub fn find_service<'a>(
    services: &'a [ServiceDefinition],
    key: &str,
) -> Option<&'a ServiceDefinition> {
    services
        .iter()
        .find(|s| s.id == key)
        .or_else(|| services.iter().find(|s| s.code.as_deref() == Some(key)))
}
