//! Trade aggregation
//!
//! Prices per-service quantities into line items and rolls them up into trade
//! estimates. [`compute_trade_estimates`] is the single recompute entry point:
//! callers run it after every batch of object or configuration changes and
//! discard whatever they computed before.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, instrument};

use super::consumption::{self, ServiceQuantities};
use super::cost;
use crate::domain::{
    find_service, ComputedLineItem, ComputedTradeEstimate, GeometricObject, ProjectEstimate,
    ServiceDefinition, TradeDefinition,
};

/// Price one trade. Returns `None` when the trade has no line items, so the
/// caller omits it instead of reporting an all-zero estimate.
pub fn aggregate(
    trade: &TradeDefinition,
    quantities: &ServiceQuantities,
    services: &[ServiceDefinition],
) -> Option<ComputedTradeEstimate> {
    let mut line_items = Vec::with_capacity(quantities.len());

    for (service_id, aggregate) in quantities {
        if aggregate.quantity <= Decimal::ZERO {
            continue;
        }
        let Some(service) = find_service(services, service_id) else {
            debug!(trade_id = %trade.id, service_id = %service_id, "Unknown service skipped");
            continue;
        };

        let breakdown = cost::calculate(service, aggregate.quantity);

        line_items.push(ComputedLineItem {
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            quantity: aggregate.quantity,
            unit: service.unit().to_string(),
            labor_hours: breakdown.labor_hours,
            labor_cost: breakdown.labor_cost,
            material_cost: breakdown.material_cost,
            equipment_cost: breakdown.equipment_cost,
            subtotal: breakdown.subtotal.max(service.minimum_charge),
            source_object_ids: aggregate.source_object_ids.clone(),
        });
    }

    if line_items.is_empty() {
        return None;
    }

    let subtotal: Decimal = line_items.iter().map(|item| item.subtotal).sum();
    let mobilization = if subtotal > Decimal::ZERO {
        trade.mobilization_cost
    } else {
        Decimal::ZERO
    };
    let margin_amount = (subtotal * trade.default_margin)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    Some(ComputedTradeEstimate {
        trade_id: trade.id.clone(),
        trade_name: trade.name.clone(),
        line_items,
        subtotal,
        mobilization,
        margin: trade.default_margin,
        margin_amount,
        total: subtotal + mobilization + margin_amount,
    })
}

/// Recompute every trade estimate from scratch, in trade order.
#[instrument(skip_all, fields(objects = objects.len(), trades = trades.len()))]
pub fn compute_trade_estimates(
    objects: &[GeometricObject],
    trades: &[TradeDefinition],
    services: &[ServiceDefinition],
) -> Vec<ComputedTradeEstimate> {
    let estimates: Vec<_> = trades
        .iter()
        .filter_map(|trade| {
            let quantities = consumption::map(objects, trade, services);
            aggregate(trade, &quantities, services)
        })
        .collect();

    debug!(priced_trades = estimates.len(), "Trade estimates recomputed");
    estimates
}

/// Recompute all trades and roll them into a project total.
pub fn compute_project_estimate(
    objects: &[GeometricObject],
    trades: &[TradeDefinition],
    services: &[ServiceDefinition],
) -> ProjectEstimate {
    ProjectEstimate::from_trades(compute_trade_estimates(objects, trades, services))
}
