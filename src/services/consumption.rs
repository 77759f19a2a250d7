//! Trade consumption mapping
//!
//! Applies a trade's declarative consumption rules to the classified objects
//! and sums the resulting quantities per service. Rules may name a service by
//! id or by code; both land on the same entry.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{find_service, GeometricObject, ServiceDefinition, TradeDefinition};

/// Aggregates with a total below this are treated as empty and dropped.
pub const QUANTITY_EPSILON: Decimal = dec!(0.0001);

/// Quantity of one service a trade needs, with the objects that fed it
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ServiceQuantity {
    pub quantity: Decimal,
    pub source_object_ids: Vec<String>,
}

/// Per-service quantities keyed by resolved service id, in service id order
pub type ServiceQuantities = BTreeMap<String, ServiceQuantity>;

pub fn map(
    objects: &[GeometricObject],
    trade: &TradeDefinition,
    services: &[ServiceDefinition],
) -> ServiceQuantities {
    let mut quantities = ServiceQuantities::new();

    for rule in &trade.consumes {
        let waste_factor = rule.waste_factor();
        // Unresolved references keep their raw key and are skipped at pricing
        let service_id = find_service(services, &rule.service_id)
            .map_or_else(|| rule.service_id.clone(), |service| service.id.clone());

        for object in objects
            .iter()
            .filter(|o| rule.matches(o.object_type, o.sub_type.as_deref()))
        {
            let contribution = object.measurements.quantity(rule.quantity_source) * waste_factor;

            let entry = quantities.entry(service_id.clone()).or_default();
            entry.quantity += contribution;
            if !entry.source_object_ids.contains(&object.id) {
                entry.source_object_ids.push(object.id.clone());
            }
        }
    }

    quantities.retain(|service_id, aggregate| {
        if aggregate.quantity < Decimal::ZERO {
            warn!(
                trade_id = %trade.id,
                service_id = %service_id,
                quantity = %aggregate.quantity,
                "Negative aggregate quantity dropped; check geometry measurements"
            );
            return false;
        }
        if aggregate.quantity < QUANTITY_EPSILON {
            debug!(trade_id = %trade.id, service_id = %service_id, "Zero quantity service dropped");
            return false;
        }
        true
    });

    quantities
}
