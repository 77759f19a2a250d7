//! Derived trade-partitioned estimate types
//!
//! Nothing here is stored on its own; every value is recomputed wholesale
//! from objects, trades and services.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One priced service inside a trade estimate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputedLineItem {
    pub service_id: String,
    pub service_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub labor_hours: Decimal,
    pub labor_cost: Decimal,
    pub material_cost: Decimal,
    pub equipment_cost: Decimal,
    pub subtotal: Decimal,
    pub source_object_ids: Vec<String>,
}

/// Priced estimate for a single trade
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputedTradeEstimate {
    pub trade_id: String,
    pub trade_name: String,
    pub line_items: Vec<ComputedLineItem>,
    pub subtotal: Decimal,
    pub mobilization: Decimal,
    pub margin: Decimal,
    pub margin_amount: Decimal,
    pub total: Decimal,
}

/// Roll-up of every trade that has work
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectEstimate {
    pub trades: Vec<ComputedTradeEstimate>,
    pub subtotal: Decimal,
    pub mobilization: Decimal,
    pub margin_amount: Decimal,
    pub total: Decimal,
}

impl ProjectEstimate {
    pub fn from_trades(trades: Vec<ComputedTradeEstimate>) -> Self {
        let subtotal: Decimal = trades.iter().map(|t| t.subtotal).sum();
        let mobilization: Decimal = trades.iter().map(|t| t.mobilization).sum();
        let margin_amount: Decimal = trades.iter().map(|t| t.margin_amount).sum();
        let total: Decimal = trades.iter().map(|t| t.total).sum();

        Self {
            trades,
            subtotal,
            mobilization,
            margin_amount,
            total,
        }
    }

    pub fn trade(&self, trade_id: &str) -> Option<&ComputedTradeEstimate> {
        self.trades.iter().find(|t| t.trade_id == trade_id)
    }
}
