//! Domain types
//!
//! These types define the data the pricing engine consumes (objects, services,
//! trades, snapshots) and the derived values it produces.

pub mod bids;
pub mod estimates;
pub mod objects;
pub mod pricing;
pub mod risk;
pub mod services;
pub mod trades;

// Re-export commonly used types
pub use bids::*;
pub use estimates::*;
pub use objects::*;
pub use pricing::*;
pub use risk::*;
pub use services::*;
pub use trades::*;
