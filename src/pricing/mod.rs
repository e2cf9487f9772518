//! Pricing engine module for diveops.
//!
//! Resolves the best price list offer for a dive count, prices tiered items
//! and reports overlapping dive ranges.

pub mod calculators;
pub mod models;
pub mod overlap;
pub mod queries;
pub mod requests;
pub mod resolver;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate_tiered_price, round_money};
pub use resolver::{resolve_dive_price, PriceQuery, ResolvedPrice};
pub use routes::router;
pub use services::PricingError;
