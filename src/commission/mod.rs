//! Agent commission module.
//!
//! Computes the commission an agent earns on an invoice and tracks its
//! `Pending -> Paid` / `Cancelled` lifecycle.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

pub use routes::router;
pub use services::{calculate_batch, calculate_commission, CommissionError};
