//! Service cost calculation
//!
//! Turns a service's cost rule and a quantity into a labor / material /
//! equipment breakdown. Minimum charges are deliberately not applied here;
//! the trade aggregator and the risk assessor each apply their own policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{PricingModel, ServiceDefinition};

/// Unadjusted cost of performing a quantity of one service
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CostBreakdown {
    pub labor_hours: Decimal,
    pub labor_cost: Decimal,
    pub material_cost: Decimal,
    pub equipment_cost: Decimal,
    pub subtotal: Decimal,
}

/// Price `quantity` units of `service`.
///
/// `quantity` must be non-negative. Callers own that contract; a negative
/// value here means an upstream geometry or input bug.
pub fn calculate(service: &ServiceDefinition, quantity: Decimal) -> CostBreakdown {
    debug_assert!(
        quantity >= Decimal::ZERO,
        "negative quantity {} passed for service {}",
        quantity,
        service.id
    );

    let labor_hours = labor_hours(service, quantity);
    let labor_cost = labor_hours * service.crew_size * service.hourly_rate * service.labor_burden_rate;

    let material_cost = match (service.pricing_model, service.material_cost_per_unit) {
        (PricingModel::Fixed, _) | (_, None) => Decimal::ZERO,
        (_, Some(per_unit)) => {
            quantity * per_unit * service.material_waste_factor.unwrap_or(Decimal::ONE)
        }
    };

    let equipment_cost = service.equipment_cost_fixed.unwrap_or(Decimal::ZERO)
        + service.equipment_cost_hourly.unwrap_or(Decimal::ZERO) * labor_hours;

    CostBreakdown {
        labor_hours,
        labor_cost,
        material_cost,
        equipment_cost,
        subtotal: labor_cost + material_cost + equipment_cost,
    }
}

fn labor_hours(service: &ServiceDefinition, quantity: Decimal) -> Decimal {
    match service.pricing_model {
        PricingModel::Area | PricingModel::Linear | PricingModel::Count => {
            if service.production_rate <= Decimal::ZERO {
                return Decimal::ZERO;
            }
            quantity
                .checked_div(service.production_rate)
                .unwrap_or(Decimal::ZERO)
        }
        PricingModel::Hourly => quantity,
        PricingModel::Fixed => Decimal::ONE,
    }
}
