//! Unified estimating error handling
//!
//! The pricing engine surfaces data-validity problems as typed errors at its
//! public boundary. Unresolvable references and unmeasurable geometry are not
//! errors; they degrade to skipped contributions or zero measurements.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("Invalid quantity: {0} (quantities must be non-negative)")]
    InvalidQuantity(Decimal),

    #[error("Invalid price: {0} (prices must be non-negative)")]
    InvalidPrice(Decimal),

    #[error("Bid not found: {0}")]
    BidNotFound(Uuid),

    #[error("Line item not found: {0}")]
    LineItemNotFound(Uuid),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Invalid pricing config: {0}")]
    InvalidConfig(String),

    #[error("Geometry could not be measured: {0}")]
    Measurement(String),
}

impl EstimateError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn measurement(msg: impl Into<String>) -> Self {
        Self::Measurement(msg.into())
    }

    /// Stable machine-readable code, used in structured log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidPrice(_) => "INVALID_PRICE",
            Self::BidNotFound(_) => "BID_NOT_FOUND",
            Self::LineItemNotFound(_) => "LINE_ITEM_NOT_FOUND",
            Self::UnknownService(_) => "UNKNOWN_SERVICE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Measurement(_) => "MEASUREMENT_FAILED",
        }
    }
}

pub type EstimateResult<T> = Result<T, EstimateError>;
