//! Parameters Builder
//!
//! Fluent construction of [`SimulationParameters`] starting from the
//! defaults, validated on `build()`.

use std::collections::BTreeMap;

use super::SimulationParameters;
use crate::error::Result;
use crate::model::{AssetClass, MarketOverride};
use crate::validation::validate_parameters;

/// Builder for [`SimulationParameters`]
#[derive(Debug, Clone, Default)]
pub struct ParametersBuilder {
    params: SimulationParameters,
}

impl ParametersBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Situation
    // =========================================================================

    #[must_use]
    pub fn starting_portfolio(mut self, value: f64) -> Self {
        self.params.starting_portfolio = value;
        self
    }

    /// Number of simulated years
    #[must_use]
    pub fn years(mut self, years: usize) -> Self {
        self.params.planning_horizon = years;
        self
    }

    #[must_use]
    pub fn age(mut self, age: u32) -> Self {
        self.params.age = age;
        self
    }

    // =========================================================================
    // Cash flows (today's dollars)
    // =========================================================================

    #[must_use]
    pub fn expenses(mut self, default_value: f64) -> Self {
        self.params.expenses.default_value = default_value;
        self
    }

    #[must_use]
    pub fn expense_in_year(mut self, year: u32, value: f64) -> Self {
        self.params.expenses.custom.insert(year, value);
        self
    }

    #[must_use]
    pub fn interpolate_expenses(mut self, enabled: bool) -> Self {
        self.params.expenses.interpolate = enabled;
        self
    }

    #[must_use]
    pub fn income(mut self, default_value: f64) -> Self {
        self.params.income.default_value = default_value;
        self
    }

    #[must_use]
    pub fn income_in_year(mut self, year: u32, value: f64) -> Self {
        self.params.income.custom.insert(year, value);
        self
    }

    #[must_use]
    pub fn interpolate_income(mut self, enabled: bool) -> Self {
        self.params.income.interpolate = enabled;
        self
    }

    /// Fixed yearly benefit (today's dollars) paid from `eligibility_age` on
    #[must_use]
    pub fn benefit(mut self, eligibility_age: u32, amount: f64) -> Self {
        self.params.benefit_age = eligibility_age;
        self.params.benefit_amount = amount;
        self
    }

    // =========================================================================
    // Rates
    // =========================================================================

    #[must_use]
    pub fn inflation(mut self, rate: f64) -> Self {
        self.params.inflation_rate = rate;
        self
    }

    #[must_use]
    pub fn expense_growth(mut self, rate: f64) -> Self {
        self.params.expense_growth_rate = rate;
        self
    }

    #[must_use]
    pub fn income_growth(mut self, rate: f64) -> Self {
        self.params.income_growth_rate = rate;
        self
    }

    /// Set inflation and both growth rates to the same value
    #[must_use]
    pub fn all_rates(self, rate: f64) -> Self {
        self.inflation(rate).expense_growth(rate).income_growth(rate)
    }

    // =========================================================================
    // Market
    // =========================================================================

    /// Replace the whole allocation; unlisted classes get zero weight
    #[must_use]
    pub fn allocation(mut self, weights: impl IntoIterator<Item = (AssetClass, f64)>) -> Self {
        self.params.asset_allocation = weights.into_iter().collect::<BTreeMap<_, _>>();
        self
    }

    #[must_use]
    pub fn mean_returns(mut self, means: Vec<f64>) -> Self {
        self.params.mean_returns = MarketOverride::Override(means);
        self
    }

    #[must_use]
    pub fn volatility(mut self, volatility: Vec<f64>) -> Self {
        self.params.volatility = MarketOverride::Override(volatility);
        self
    }

    #[must_use]
    pub fn correlation(mut self, matrix: Vec<Vec<f64>>) -> Self {
        self.params.correlation_matrix = MarketOverride::Override(matrix);
        self
    }

    /// Zero volatility and the same mean return for every asset class
    #[must_use]
    pub fn fixed_return(self, rate: f64) -> Self {
        self.mean_returns(vec![rate; AssetClass::COUNT])
            .volatility(vec![0.0; AssetClass::COUNT])
    }

    // =========================================================================
    // Run control
    // =========================================================================

    #[must_use]
    pub fn simulations(mut self, count: usize) -> Self {
        self.params.num_simulations = count;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    /// Validate and return the parameters
    pub fn build(self) -> Result<SimulationParameters> {
        validate_parameters(&self.params)?;
        Ok(self.params)
    }

    /// Return the parameters without validation
    #[must_use]
    pub fn build_unchecked(self) -> SimulationParameters {
        self.params
    }
}
