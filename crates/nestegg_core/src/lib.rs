//! Personal cash-flow projection and retirement simulation library
//!
//! Two independent engines share this crate:
//! - A deterministic cash-flow projector that expands dated revenue and
//!   expense transactions into a daily ledger and weekly, monthly, quarterly
//!   and annual summaries
//! - A Monte Carlo retirement simulator that grows a portfolio with
//!   correlated multi-asset returns, applies yearly nominal cash flows and
//!   reports the risk of depletion
//!
//! # Builder DSL
//!
//! ```ignore
//! use nestegg_core::config::ParametersBuilder;
//! use nestegg_core::model::AssetClass;
//!
//! let params = ParametersBuilder::new()
//!     .starting_portfolio(1_000_000.0)
//!     .years(30)
//!     .age(60)
//!     .expenses(45_000.0)
//!     .benefit(67, 20_000.0)
//!     .allocation([(AssetClass::Stocks, 0.7), (AssetClass::Bonds, 0.3)])
//!     .build()?;
//!
//! let summary = nestegg_core::metrics::run(&params)?;
//! println!("risk of depletion: {:.1}%", summary.risk_of_depletion * 100.0);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod cash_flows;
pub mod date_math;
pub mod error;
pub mod metrics;
pub mod nominal;
pub mod returns;
pub mod simulation;
pub mod validation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use cash_flows::project;
pub use config::{ParametersBuilder, SimulationParameters};
pub use error::{ProjectionError, SimulationError};
pub use metrics::{depletion_risk, run, summarize};
pub use returns::CorrelatedReturnSampler;
pub use simulation::{simulate, simulate_with_progress};
