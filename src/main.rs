use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use blueprintx_estimator::config;
use blueprintx_estimator::domain::{
    Bid, BidContext, GeometricObject, MeasurementSnapshot, PricingConfig, ProjectEstimate,
};
use blueprintx_estimator::logging;
use blueprintx_estimator::services::{compute_project_estimate, BidEngine};

/// Committed takeoff exported by the drawing layer
#[derive(Debug, Deserialize)]
struct Takeoff {
    objects: Vec<GeometricObject>,
    #[serde(default)]
    bid: Option<BidRequest>,
}

/// Manually chosen services to price as a flat bid
#[derive(Debug, Deserialize)]
struct BidRequest {
    snapshot: MeasurementSnapshot,
    #[serde(default)]
    context: Option<BidContext>,
    #[serde(default)]
    margin: Option<Decimal>,
    items: Vec<BidItemRequest>,
}

#[derive(Debug, Deserialize)]
struct BidItemRequest {
    service_id: String,
    quantity: Decimal,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct EstimateReport {
    estimate: ProjectEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    bid: Option<Bid>,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        pricing_config = %settings.pricing_config_path.display(),
        takeoff = %settings.takeoff_path.display(),
        "Starting BlueprintX estimator"
    );

    let mut pricing = load_pricing_config(&settings.pricing_config_path)?;
    pricing.risk_thresholds = settings.risk_overrides.apply(pricing.risk_thresholds);

    let takeoff: Takeoff = read_json(&settings.takeoff_path)?;
    tracing::info!(
        objects = takeoff.objects.len(),
        trades = pricing.trades.len(),
        services = pricing.services.len(),
        "Inputs loaded"
    );

    let estimate = compute_project_estimate(&takeoff.objects, &pricing.trades, &pricing.services);
    tracing::info!(
        priced_trades = estimate.trades.len(),
        total = %estimate.total,
        "Trade estimate computed"
    );

    let bid = takeoff.bid.map(|request| price_bid(&pricing, request));

    let report = EstimateReport { estimate, bid };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize estimate report")?
    );

    Ok(())
}

fn price_bid(pricing: &PricingConfig, request: BidRequest) -> Bid {
    let engine = BidEngine::new(pricing);
    let mut bid = engine.create_bid(request.snapshot, request.context);

    if let Some(margin) = request.margin {
        bid = engine.set_margin(&bid, margin);
    }

    for item in request.items {
        match engine.add_service(&bid, &item.service_id, item.quantity, item.description) {
            Ok(next) => bid = next,
            Err(e) => {
                tracing::warn!(
                    service_id = %item.service_id,
                    code = e.error_code(),
                    error = %e,
                    "Bid item skipped"
                );
            }
        }
    }

    for flag in &bid.risk_flags {
        tracing::warn!(flag = ?flag.flag_type, severity = ?flag.severity, "{}", flag.message);
    }
    tracing::info!(bid_id = %bid.id, total = %bid.total, "Bid priced");

    bid
}

fn load_pricing_config(path: &Path) -> Result<PricingConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pricing config {}", path.display()))?;
    PricingConfig::from_json_str(&raw)
        .with_context(|| format!("Invalid pricing config {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
