use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use blueprintx_estimator::domain::{
    GeometricObject, LineItemUpdate, MeasurementSnapshot, PricingConfig, RiskFlagType,
    Severity, ShapeMeasurement,
};
use blueprintx_estimator::services::{compute_trade_estimates, BidEngine};

const PRICING: &str = r#"{
    "id": "lot-maint-2026",
    "name": "Parking lot maintenance",
    "default_margin": 0.25,
    "services": [
        {
            "id": "sealcoat",
            "name": "Sealcoat 2-coat",
            "pricing_model": "area",
            "production_rate": 500,
            "crew_size": 4,
            "hourly_rate": 0.85,
            "labor_burden_rate": 1,
            "material_cost_per_unit": 1.45,
            "material_waste_factor": 1.05,
            "minimum_charge": 0
        },
        {
            "id": "crackfill",
            "code": "CF",
            "name": "Hot-pour crack fill",
            "pricing_model": "linear",
            "production_rate": 200,
            "crew_size": 2,
            "hourly_rate": 40,
            "labor_burden_rate": 1.25,
            "material_cost_per_unit": 0.35,
            "equipment_cost_fixed": 150,
            "minimum_charge": 500
        },
        {
            "id": "stall-stripe",
            "name": "Stall restripe",
            "pricing_model": "count",
            "production_rate": 20,
            "crew_size": 2,
            "hourly_rate": 45,
            "material_cost_per_unit": 3,
            "minimum_charge": 250
        }
    ],
    "trades": [
        {
            "id": "sealcoating",
            "name": "Sealcoating",
            "consumes": [
                { "object_type": "pavement", "quantity_source": "area", "service_id": "sealcoat" },
                { "object_type": "crack", "quantity_source": "length", "service_id": "CF" }
            ],
            "mobilization_cost": 400,
            "default_margin": 0.25
        },
        {
            "id": "striping",
            "name": "Striping",
            "consumes": [
                { "object_type": "parking_stall", "quantity_source": "count", "service_id": "stall-stripe" },
                { "object_type": "ada_stall", "quantity_source": "count", "service_id": "stall-stripe" }
            ],
            "mobilization_cost": 200,
            "default_margin": 0.3
        },
        {
            "id": "concrete",
            "name": "Concrete repair",
            "consumes": [
                { "object_type": "concrete", "quantity_source": "area", "service_id": "concrete-patch" }
            ],
            "mobilization_cost": 900,
            "default_margin": 0.2
        }
    ]
}"#;

const OBJECTS: &str = r#"[
    { "id": "lot-north", "object_type": "pavement", "geometry": { "kind": "polygon", "exterior": [[0,0],[100,0],[100,60],[0,60]] }, "measurements": { "area": 6000, "perimeter": 320 } },
    { "id": "lot-south", "object_type": "pavement", "geometry": { "kind": "polygon", "exterior": [[0,0],[100,0],[100,40],[0,40]] }, "measurements": { "area": 4000, "perimeter": 280 } },
    { "id": "crack-1", "object_type": "crack", "geometry": { "kind": "line_string", "points": [[0,0],[40,0]] }, "measurements": { "length": 40 } },
    { "id": "stall-1", "object_type": "parking_stall", "sub_type": "standard", "geometry": { "kind": "point", "position": [5,5] }, "measurements": { "count": 1 }, "source": "ai-detected", "confidence": 0.93 },
    { "id": "stall-2", "object_type": "parking_stall", "sub_type": "standard", "geometry": { "kind": "point", "position": [15,5] }, "measurements": { "count": 1 }, "source": "ai-detected", "confidence": 0.88 },
    { "id": "ada-1", "object_type": "ada_stall", "geometry": { "kind": "point", "position": [25,5] }, "measurements": { "count": 1 } },
    { "id": "bldg", "object_type": "building", "geometry": { "kind": "polygon", "exterior": [[0,0],[10,0],[10,10],[0,10]] } }
]"#;

fn inputs() -> (PricingConfig, Vec<GeometricObject>) {
    let config = PricingConfig::from_json_str(PRICING).unwrap();
    let objects = serde_json::from_str(OBJECTS).unwrap();
    (config, objects)
}

fn snapshot() -> MeasurementSnapshot {
    MeasurementSnapshot::from_shapes(
        vec![
            ShapeMeasurement {
                id: "lot-north".into(),
                label: Some("North lot".into()),
                area: dec!(6000),
                perimeter: dec!(320),
            },
            ShapeMeasurement {
                id: "lot-south".into(),
                label: None,
                area: dec!(4000),
                perimeter: dec!(280),
            },
        ],
        vec![],
        Utc.with_ymd_and_hms(2026, 10, 1, 14, 30, 0).unwrap(),
    )
}

#[test]
fn trade_estimates_from_takeoff() {
    let (config, objects) = inputs();

    let estimates = compute_trade_estimates(&objects, &config.trades, &config.services);

    // Concrete has no matching objects and an unknown service, so it is absent
    let ids: Vec<_> = estimates.iter().map(|e| e.trade_id.as_str()).collect();
    assert_eq!(ids, vec!["sealcoating", "striping"]);

    let sealcoating = &estimates[0];
    let sealcoat = &sealcoating.line_items[1];
    assert_eq!(sealcoat.service_id, "sealcoat");
    assert_eq!(sealcoat.quantity, dec!(10000));
    assert_eq!(sealcoat.labor_hours, dec!(20));
    assert_eq!(sealcoat.subtotal, dec!(15293));
    assert_eq!(sealcoat.source_object_ids, vec!["lot-north", "lot-south"]);

    // 40 ft of crack fill computes to 184 and is lifted to the 500 minimum
    let crackfill = &sealcoating.line_items[0];
    assert_eq!(crackfill.service_id, "crackfill");
    assert_eq!(crackfill.subtotal, dec!(500));

    assert_eq!(sealcoating.subtotal, dec!(15793));
    assert_eq!(sealcoating.mobilization, dec!(400));
    assert_eq!(sealcoating.margin_amount, dec!(3948));
    assert_eq!(sealcoating.total, dec!(20141));

    // Standard and ADA stalls both feed one stall-stripe line
    let striping = &estimates[1];
    assert_eq!(striping.line_items.len(), 1);
    assert_eq!(striping.line_items[0].quantity, dec!(3));
    assert_eq!(striping.line_items[0].unit, "ea");
    assert_eq!(striping.line_items[0].subtotal, dec!(250));
    assert_eq!(striping.total, dec!(525));
}

#[test]
fn recomputing_unchanged_inputs_is_deep_equal() {
    let (config, objects) = inputs();

    let first = compute_trade_estimates(&objects, &config.trades, &config.services);
    let second = compute_trade_estimates(&objects, &config.trades, &config.services);

    assert_eq!(first, second);
}

#[test]
fn manual_bid_end_to_end() {
    let (config, _) = inputs();
    let engine = BidEngine::new(&config);

    let bid = engine.create_bid(snapshot(), None);
    assert_eq!(bid.measurements.total_area, dec!(10000));

    let bid = engine
        .add_service(&bid, "sealcoat", bid_area(), Some("Both lots".into()))
        .unwrap();
    assert_eq!(bid.subtotal, dec!(15293));
    assert_eq!(bid.total, dec!(19116.25));

    let bid = engine.add_service(&bid, "CF", dec!(40), None).unwrap();
    let crack_id = bid.line_items[1].id;
    let below: Vec<_> = bid
        .risk_flags
        .iter()
        .filter(|f| f.flag_type == RiskFlagType::BelowMinimum)
        .collect();
    assert_eq!(below.len(), 1);
    assert!(below[0].message.contains("Hot-pour crack fill"));

    let bid = engine
        .update_line_item(
            &bid,
            crack_id,
            LineItemUpdate {
                override_price: Some(dec!(1000)),
                ..Default::default()
            },
        )
        .unwrap();
    let crack = bid.line_item(crack_id).unwrap();
    assert_eq!(crack.labor_cost, dec!(20));
    assert_eq!(crack.material_cost, dec!(14));
    assert_eq!(crack.equipment_cost, dec!(150));
    assert_eq!(bid.subtotal, dec!(16293));
    assert!(bid
        .risk_flags
        .iter()
        .all(|f| f.flag_type != RiskFlagType::BelowMinimum));

    let bid = engine.set_margin(&bid, dec!(0.08));
    let low = bid
        .risk_flags
        .iter()
        .find(|f| f.flag_type == RiskFlagType::LowMargin)
        .unwrap();
    assert_eq!(low.severity, Severity::Error);

    let bid = engine.set_margin(&bid, dec!(1.5));
    assert_eq!(bid.margin, Decimal::ONE);
    assert_eq!(bid.total, dec!(32586));
}

fn bid_area() -> Decimal {
    snapshot().total_area
}
