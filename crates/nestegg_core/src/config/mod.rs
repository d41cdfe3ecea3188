//! Simulation configuration
//!
//! The main configuration type is `SimulationParameters`, which contains
//! everything needed for one Monte Carlo run. Amounts in the expense and
//! income schedules are in today's dollars; the simulator converts them to
//! nominal values year by year.
//!
//! # Builder DSL
//!
//! ```ignore
//! use nestegg_core::config::ParametersBuilder;
//! use nestegg_core::model::AssetClass;
//!
//! let params = ParametersBuilder::new()
//!     .starting_portfolio(1_200_000.0)
//!     .years(35)
//!     .age(55)
//!     .expenses(60_000.0)
//!     .expense_in_year(10, 45_000.0)
//!     .benefit(67, 24_000.0)
//!     .allocation([(AssetClass::Stocks, 0.6), (AssetClass::Bonds, 0.4)])
//!     .seed(7)
//!     .build()?;
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AssetClass, MarketOverride};

pub mod builder;

pub use builder::ParametersBuilder;

pub const DEFAULT_NUM_SIMULATIONS: usize = 1000;

/// Present-value amounts per simulation year.
///
/// `custom` maps a relative year index (0 = first simulated year) to an
/// amount that replaces `default_value` for that year. With `interpolate`
/// set, years between two custom entries are linearly interpolated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YearSchedule {
    pub default_value: f64,
    pub custom: BTreeMap<u32, f64>,
    pub interpolate: bool,
}

impl YearSchedule {
    #[must_use]
    pub fn flat(default_value: f64) -> Self {
        Self {
            default_value,
            ..Default::default()
        }
    }
}

/// Complete input for one Monte Carlo run
///
/// # Conceptual Organization
///
/// **Your situation**: `starting_portfolio`, `age`, `planning_horizon`
///
/// **Your plan**: `expenses`, `income`, `benefit_age`, `benefit_amount`,
/// `asset_allocation`
///
/// **World assumptions**: growth and inflation rates, plus optional
/// overrides of the market's mean returns, volatility and correlation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    // === Your Situation ===
    pub starting_portfolio: f64,
    /// Number of simulated years
    pub planning_horizon: usize,
    pub age: u32,

    // === Your Plan ===
    pub expenses: YearSchedule,
    pub income: YearSchedule,
    /// Age at which the fixed benefit starts paying
    pub benefit_age: u32,
    /// Yearly benefit in today's dollars
    pub benefit_amount: f64,
    /// Weight per asset class; classes not listed get zero weight
    pub asset_allocation: BTreeMap<AssetClass, f64>,

    // === World Assumptions ===
    pub inflation_rate: f64,
    pub expense_growth_rate: f64,
    pub income_growth_rate: f64,
    pub mean_returns: MarketOverride<Vec<f64>>,
    pub volatility: MarketOverride<Vec<f64>>,
    pub correlation_matrix: MarketOverride<Vec<Vec<f64>>>,

    // === Run Control ===
    pub num_simulations: usize,
    /// Fixed seed for reproducible runs; drawn from the OS when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        let equal_weight = 1.0 / AssetClass::COUNT as f64;
        Self {
            starting_portfolio: 1_700_000.0,
            planning_horizon: 40,
            age: 45,
            expenses: YearSchedule::flat(50_000.0),
            income: YearSchedule::flat(0.0),
            benefit_age: 67,
            benefit_amount: 10_000.0,
            asset_allocation: AssetClass::ALL
                .iter()
                .map(|asset| (*asset, equal_weight))
                .collect(),
            inflation_rate: 0.02,
            expense_growth_rate: 0.02,
            income_growth_rate: 0.03,
            mean_returns: MarketOverride::UseDefault,
            volatility: MarketOverride::UseDefault,
            correlation_matrix: MarketOverride::UseDefault,
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            seed: None,
        }
    }
}

impl SimulationParameters {
    /// Allocation weights in `AssetClass::ALL` order
    #[must_use]
    pub fn allocation_weights(&self) -> Vec<f64> {
        AssetClass::ALL
            .iter()
            .map(|asset| self.asset_allocation.get(asset).copied().unwrap_or(0.0))
            .collect()
    }

    /// Age reached during simulation year `year`
    #[must_use]
    pub fn age_in_year(&self, year: u32) -> u32 {
        self.age + year
    }

    /// Check every bound, the allocation sum and the override dimensions
    pub fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_parameters(self)
    }

    /// Replace the path count (e.g. a caller trading accuracy for latency)
    #[must_use]
    pub fn with_num_simulations(mut self, num_simulations: usize) -> Self {
        self.num_simulations = num_simulations;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allocation_is_equal_weight() {
        let params = SimulationParameters::default();
        let weights = params.allocation_weights();
        assert_eq!(weights.len(), AssetClass::COUNT);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_allocation_entries_are_zero() {
        let params = SimulationParameters {
            asset_allocation: BTreeMap::from([(AssetClass::Gold, 1.0)]),
            ..Default::default()
        };
        assert_eq!(params.allocation_weights(), vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let params: SimulationParameters = serde_json::from_str(
            r#"{"age": 60, "expenses": {"default_value": 40000, "custom": {"5": 30000}}}"#,
        )
        .unwrap();
        assert_eq!(params.age, 60);
        assert_eq!(params.expenses.custom.get(&5), Some(&30_000.0));
        assert!(!params.expenses.interpolate);
        assert_eq!(params.planning_horizon, 40);
        assert_eq!(params.mean_returns, MarketOverride::UseDefault);
    }

    #[test]
    fn test_override_roundtrips_through_json() {
        let params = SimulationParameters {
            volatility: MarketOverride::Override(vec![0.0; 6]),
            ..Default::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: SimulationParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back.volatility, params.volatility);
    }
}
