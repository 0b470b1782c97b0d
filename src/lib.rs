//! Affiliate performance tracking and tiered incentive payouts.
//!
//! The crate is organized around three domains: affiliate `accounts` (and the
//! categories they sell in), the per-day `sales` ledger fed by CSV uploads,
//! and the `incentives` rule engine that turns period aggregates into payable
//! bonus amounts. `reports` composes the three into dashboard summaries.

pub mod accounts;
pub mod config;
pub mod error;
pub mod incentives;
pub mod reports;
pub mod sales;
pub mod telemetry;
