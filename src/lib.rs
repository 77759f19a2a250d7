//! Measurement-to-estimate pricing engine.
//!
//! Converts classified site objects and trade/service cost rules into priced
//! line items, trade estimates and bids. Nothing in the engine performs I/O.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod services;
pub mod session;

pub use error::{EstimateError, EstimateResult};
pub use session::EstimatingSession;
