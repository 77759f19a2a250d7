//! Manual bid line-item engine
//!
//! A bid moves from empty, through line-item and margin edits, to whatever the
//! caller does with it next (submission is not tracked here). Every operation
//! borrows the current bid and returns the next one with totals and risk flags
//! recomputed from scratch. A rejected edit leaves the caller's bid untouched.

use rust_decimal::Decimal;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{cost, risk};
use crate::domain::{
    Bid, BidContext, BidLineItem, LineItemUpdate, MeasurementSnapshot, PricingConfig,
    ServiceDefinition,
};
use crate::error::{EstimateError, EstimateResult};

/// Recompute bid totals from its line items.
///
/// This is the only place bid totals are derived.
pub fn recalculate_totals(mut bid: Bid) -> Bid {
    let subtotal: Decimal = bid.line_items.iter().map(BidLineItem::effective_price).sum();
    let margin_amount = subtotal * bid.margin;

    bid.subtotal = subtotal;
    bid.margin_amount = margin_amount;
    bid.total = subtotal + margin_amount;
    bid
}

/// Bid operations bound to one pricing configuration
pub struct BidEngine<'a> {
    config: &'a PricingConfig,
}

impl<'a> BidEngine<'a> {
    pub fn new(config: &'a PricingConfig) -> Self {
        Self { config }
    }

    pub fn create_bid(&self, snapshot: MeasurementSnapshot, context: Option<BidContext>) -> Bid {
        let bid = Bid {
            id: Uuid::new_v4(),
            measurements: snapshot,
            pricing_config_id: self.config.id.clone(),
            context: context.unwrap_or_default(),
            line_items: Vec::new(),
            margin: clamp_margin(self.config.default_margin),
            subtotal: Decimal::ZERO,
            margin_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            risk_flags: Vec::new(),
        };

        info!(bid_id = %bid.id, pricing_config_id = %bid.pricing_config_id, "Bid created");
        bid
    }

    /// Add a priced line item. The service must belong to the bound
    /// configuration, since later quantity edits re-price from it.
    #[instrument(skip(self, bid, service), fields(bid_id = %bid.id, service_id = %service.id))]
    pub fn add_line_item(
        &self,
        bid: &Bid,
        service: &ServiceDefinition,
        quantity: Decimal,
        description: Option<String>,
    ) -> EstimateResult<Bid> {
        check_quantity(quantity)?;
        if !self.config.services.iter().any(|s| s.id == service.id) {
            return Err(EstimateError::UnknownService(service.id.clone()));
        }

        let mut item = BidLineItem {
            id: Uuid::new_v4(),
            service_type_id: service.id.clone(),
            service_name: service.name.clone(),
            description,
            quantity,
            unit: service.unit().to_string(),
            labor_hours: Decimal::ZERO,
            labor_cost: Decimal::ZERO,
            material_cost: Decimal::ZERO,
            equipment_cost: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            override_price: None,
            override_quantity: None,
        };
        price_item(&mut item, service);

        debug!(line_item_id = %item.id, subtotal = %item.subtotal, "Line item added");
        let mut next = bid.clone();
        next.line_items.push(item);
        Ok(self.refresh(next))
    }

    /// Add a line item by service id or code from the bound configuration.
    pub fn add_service(
        &self,
        bid: &Bid,
        service_id: &str,
        quantity: Decimal,
        description: Option<String>,
    ) -> EstimateResult<Bid> {
        let service = self
            .config
            .service(service_id)
            .ok_or_else(|| EstimateError::UnknownService(service_id.to_string()))?;
        self.add_line_item(bid, service, quantity, description)
    }

    /// Filter a line item out. An id that is not on the bid changes nothing.
    pub fn remove_line_item(&self, bid: &Bid, id: Uuid) -> Bid {
        let mut next = bid.clone();
        next.line_items.retain(|item| item.id != id);
        if next.line_items.len() == bid.line_items.len() {
            debug!(bid_id = %bid.id, line_item_id = %id, "Line item not on bid");
        } else {
            debug!(bid_id = %bid.id, line_item_id = %id, "Line item removed");
        }
        self.refresh(next)
    }

    /// Edit a line item. Quantity edits re-price the labor/material/equipment
    /// breakdown from the effective quantity; an override price only replaces
    /// the amount that counts toward totals.
    #[instrument(skip(self, bid, update), fields(bid_id = %bid.id))]
    pub fn update_line_item(
        &self,
        bid: &Bid,
        id: Uuid,
        update: LineItemUpdate,
    ) -> EstimateResult<Bid> {
        if let Some(quantity) = update.quantity {
            check_quantity(quantity)?;
        }
        if let Some(quantity) = update.override_quantity {
            check_quantity(quantity)?;
        }
        if let Some(price) = update.override_price {
            if price < Decimal::ZERO {
                return Err(EstimateError::InvalidPrice(price));
            }
        }

        let mut next = bid.clone();
        let item = next
            .line_items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(EstimateError::LineItemNotFound(id))?;

        let mut quantity_changed = false;
        if let Some(quantity) = update.quantity {
            quantity_changed |= item.quantity != quantity;
            item.quantity = quantity;
        }
        if update.clear_override_quantity {
            quantity_changed |= item.override_quantity.is_some();
            item.override_quantity = None;
        }
        if let Some(quantity) = update.override_quantity {
            quantity_changed |= item.override_quantity != Some(quantity);
            item.override_quantity = Some(quantity);
        }
        if let Some(description) = update.description {
            item.description = Some(description);
        }
        if update.clear_override_price {
            item.override_price = None;
        }
        if let Some(price) = update.override_price {
            item.override_price = Some(price);
        }

        if quantity_changed {
            // A quantity without a matching breakdown is never stored
            let service = self
                .config
                .service(&item.service_type_id)
                .ok_or_else(|| EstimateError::UnknownService(item.service_type_id.clone()))?;
            price_item(item, service);
        }

        Ok(self.refresh(next))
    }

    pub fn set_margin(&self, bid: &Bid, margin: Decimal) -> Bid {
        let mut next = bid.clone();
        next.margin = clamp_margin(margin);
        self.refresh(next)
    }

    /// Swap the bid's measurement snapshot. Line items are left for the caller
    /// to re-quantify against the new snapshot.
    pub fn replace_measurements(&self, bid: &Bid, snapshot: MeasurementSnapshot) -> Bid {
        let mut next = bid.clone();
        next.measurements = snapshot;
        self.refresh(next)
    }

    /// Recompute totals and then risk flags.
    pub fn refresh(&self, bid: Bid) -> Bid {
        let mut bid = recalculate_totals(bid);
        bid.risk_flags = risk::assess_with(&bid, &self.config.services, &self.config.risk_thresholds);
        bid
    }
}

fn price_item(item: &mut BidLineItem, service: &ServiceDefinition) {
    let breakdown = cost::calculate(service, item.effective_quantity());
    item.labor_hours = breakdown.labor_hours;
    item.labor_cost = breakdown.labor_cost;
    item.material_cost = breakdown.material_cost;
    item.equipment_cost = breakdown.equipment_cost;
    item.subtotal = breakdown.subtotal;
}

fn check_quantity(quantity: Decimal) -> EstimateResult<()> {
    if quantity < Decimal::ZERO {
        return Err(EstimateError::InvalidQuantity(quantity));
    }
    Ok(())
}

fn clamp_margin(margin: Decimal) -> Decimal {
    margin.clamp(Decimal::ZERO, Decimal::ONE)
}
