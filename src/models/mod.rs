//! Shared dive center models

pub mod dive_center;

pub use dive_center::{DiveCenter, TaxRates, TaxSetting};
