use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::risk::RiskFlag;

/// Measured shape captured in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShapeMeasurement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub area: Decimal,
    pub perimeter: Decimal,
}

/// Point-in-time capture of a committed drawing session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeasurementSnapshot {
    pub total_area: Decimal,
    pub total_perimeter: Decimal,
    #[serde(default)]
    pub heights: Vec<Decimal>,
    #[serde(default)]
    pub shapes: Vec<ShapeMeasurement>,
    pub captured_at: DateTime<Utc>,
}

impl MeasurementSnapshot {
    /// Build a snapshot whose totals are summed from its shapes.
    pub fn from_shapes(
        shapes: Vec<ShapeMeasurement>,
        heights: Vec<Decimal>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            total_area: shapes.iter().map(|s| s.area).sum(),
            total_perimeter: shapes.iter().map(|s| s.perimeter).sum(),
            heights,
            shapes,
            captured_at,
        }
    }
}

/// Optional job context attached when a bid is created
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BidContext {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub site_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Manually curated line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BidLineItem {
    pub id: Uuid,
    pub service_type_id: String,
    pub service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit: String,
    pub labor_hours: Decimal,
    pub labor_cost: Decimal,
    pub material_cost: Decimal,
    pub equipment_cost: Decimal,
    pub subtotal: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_quantity: Option<Decimal>,
}

impl BidLineItem {
    /// Quantity used for pricing: the override when one is set.
    pub fn effective_quantity(&self) -> Decimal {
        self.override_quantity.unwrap_or(self.quantity)
    }

    /// Amount that counts toward bid totals: the override price when one is set.
    pub fn effective_price(&self) -> Decimal {
        self.override_price.unwrap_or(self.subtotal)
    }
}

/// Partial edit of a bid line item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItemUpdate {
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub override_price: Option<Decimal>,
    #[serde(default)]
    pub override_quantity: Option<Decimal>,
    #[serde(default)]
    pub clear_override_price: bool,
    #[serde(default)]
    pub clear_override_quantity: bool,
}

/// Bid priced from a flat list of line items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bid {
    pub id: Uuid,
    pub measurements: MeasurementSnapshot,
    pub pricing_config_id: String,
    #[serde(default)]
    pub context: BidContext,
    pub line_items: Vec<BidLineItem>,
    pub margin: Decimal,
    pub subtotal: Decimal,
    pub margin_amount: Decimal,
    pub total: Decimal,
    pub risk_flags: Vec<RiskFlag>,
}

impl Bid {
    pub fn line_item(&self, id: Uuid) -> Option<&BidLineItem> {
        self.line_items.iter().find(|item| item.id == id)
    }
}
