//! Bid risk assessment

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{
    find_service, Bid, RiskFlag, RiskFlagType, RiskThresholds, ServiceDefinition, Severity,
};

/// Assess a bid against the default thresholds.
pub fn assess(bid: &Bid, services: &[ServiceDefinition]) -> Vec<RiskFlag> {
    assess_with(bid, services, &RiskThresholds::default())
}

/// Scan a priced bid for risky cost structure. Each rule is independent, so a
/// bid can carry several flags at once.
pub fn assess_with(
    bid: &Bid,
    services: &[ServiceDefinition],
    thresholds: &RiskThresholds,
) -> Vec<RiskFlag> {
    if bid.line_items.is_empty() || bid.subtotal.is_zero() {
        return Vec::new();
    }

    let mut flags = Vec::new();

    if bid.margin < thresholds.low_margin_warning {
        let severity = if bid.margin < thresholds.low_margin_error {
            Severity::Error
        } else {
            Severity::Warning
        };
        flags.push(RiskFlag {
            flag_type: RiskFlagType::LowMargin,
            message: format!(
                "Margin of {}% is below the {}% target",
                percent(bid.margin),
                percent(thresholds.low_margin_warning)
            ),
            severity,
        });
    }

    let labor: Decimal = bid.line_items.iter().map(|item| item.labor_cost).sum();
    let labor_ratio = labor / bid.subtotal;
    if labor_ratio > thresholds.labor_heavy_ratio {
        flags.push(RiskFlag {
            flag_type: RiskFlagType::LaborHeavy,
            message: format!(
                "Labor is {}% of the subtotal; productivity overruns will hit margin directly",
                percent(labor_ratio)
            ),
            severity: Severity::Warning,
        });
    }

    let material: Decimal = bid.line_items.iter().map(|item| item.material_cost).sum();
    let material_ratio = material / bid.subtotal;
    if material_ratio > thresholds.material_sensitive_ratio {
        flags.push(RiskFlag {
            flag_type: RiskFlagType::MaterialSensitive,
            message: format!(
                "Materials are {}% of the subtotal; confirm supplier pricing before submitting",
                percent(material_ratio)
            ),
            severity: Severity::Warning,
        });
    }

    for item in &bid.line_items {
        let Some(service) = find_service(services, &item.service_type_id) else {
            continue;
        };
        let price = item.effective_price();
        if price < service.minimum_charge {
            flags.push(RiskFlag {
                flag_type: RiskFlagType::BelowMinimum,
                message: format!(
                    "{} is priced at ${} which is below its minimum charge of ${}",
                    service.name,
                    money(price),
                    money(service.minimum_charge)
                ),
                severity: Severity::Error,
            });
        }
    }

    flags
}

fn percent(ratio: Decimal) -> Decimal {
    (ratio * dec!(100)).round_dp(1).normalize()
}

fn money(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}
