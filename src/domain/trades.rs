//! Trade definitions and their consumption rules

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::objects::ObjectType;

/// Measurement field a consumption rule reads as its quantity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuantitySource {
    Area,
    Perimeter,
    Length,
    Count,
}

/// Maps one classified object type onto a service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsumptionRule {
    pub object_type: ObjectType,
    /// Empty means every sub-type of `object_type` matches
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_types: Vec<String>,
    pub quantity_source: QuantitySource,
    pub service_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_factor: Option<Decimal>,
}

impl ConsumptionRule {
    pub fn matches(&self, object_type: ObjectType, sub_type: Option<&str>) -> bool {
        if self.object_type != object_type {
            return false;
        }
        if self.sub_types.is_empty() {
            return true;
        }
        sub_type.is_some_and(|st| self.sub_types.iter().any(|s| s == st))
    }

    pub fn waste_factor(&self) -> Decimal {
        self.waste_factor.unwrap_or(Decimal::ONE)
    }
}

/// A contracting discipline bundling services under one mobilization and margin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradeDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub consumes: Vec<ConsumptionRule>,
    #[serde(default)]
    pub mobilization_cost: Decimal,
    pub default_margin: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rule(sub_types: &[&str]) -> ConsumptionRule {
        ConsumptionRule {
            object_type: ObjectType::ParkingStall,
            sub_types: sub_types.iter().map(|s| s.to_string()).collect(),
            quantity_source: QuantitySource::Count,
            service_id: "stall-striping".into(),
            waste_factor: None,
        }
    }

    #[test]
    fn test_rule_matching() {
        let any = rule(&[]);
        assert!(any.matches(ObjectType::ParkingStall, None));
        assert!(any.matches(ObjectType::ParkingStall, Some("compact")));
        assert!(!any.matches(ObjectType::AdaStall, None));

        let ada_only = rule(&["ada", "van"]);
        assert!(ada_only.matches(ObjectType::ParkingStall, Some("van")));
        assert!(!ada_only.matches(ObjectType::ParkingStall, Some("standard")));
        assert!(!ada_only.matches(ObjectType::ParkingStall, None));
    }

    #[test]
    fn test_waste_factor_defaults_to_one() {
        let mut r = rule(&[]);
        assert_eq!(r.waste_factor(), Decimal::ONE);

        r.waste_factor = Some(dec!(1.1));
        assert_eq!(r.waste_factor(), dec!(1.1));
    }
}
