//! Pricing engine services.
//!
//! Pure computations over in-memory inputs: cost calculation, consumption
//! mapping, trade aggregation, bid line items and risk assessment, plus the
//! object store that keeps measurements in step with geometry.

pub mod aggregation;
pub mod bid_engine;
pub mod consumption;
pub mod cost;
pub mod objects;
pub mod risk;

pub use aggregation::{compute_project_estimate, compute_trade_estimates};
pub use bid_engine::BidEngine;
pub use objects::{GeometryMeasurer, ObjectStore};
