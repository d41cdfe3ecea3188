//! Input validation for simulation parameters
//!
//! Every numeric field maps to a [`LimitKind`] whose bounds are fixed at
//! compile time. Validation stops at the first failing field and reports the
//! field, the value and the bound it broke.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{SimulationParameters, YearSchedule};
use crate::error::{Result, SimulationError};
use crate::model::AssetClass;

/// Allowed distance of the allocation sum from 1.0
pub const ALLOCATION_TOLERANCE: f64 = 1e-4;

/// Allowed difference between `ρ[i][j]` and `ρ[j][i]`
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Numeric bounds; `max` is always inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub min_exclusive: bool,
}

impl Bounds {
    /// `min <= value <= max`
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_exclusive: false,
        }
    }

    /// `min < value <= max`
    #[must_use]
    pub const fn above(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_exclusive: true,
        }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        let above_min = if self.min_exclusive {
            value > self.min
        } else {
            value >= self.min
        };
        above_min && value <= self.max
    }
}

/// Families of inputs sharing the same limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKind {
    Portfolio,
    Horizon,
    Age,
    Expenses,
    Income,
    Simulations,
    Rate,
}

impl LimitKind {
    #[must_use]
    pub const fn bounds(self) -> Bounds {
        match self {
            LimitKind::Portfolio => Bounds::above(0.0, 100_000_000.0),
            LimitKind::Horizon => Bounds::new(1.0, 100.0),
            LimitKind::Age => Bounds::new(10.0, 100.0),
            LimitKind::Expenses => Bounds::new(0.0, 10_000_000.0),
            LimitKind::Income => Bounds::new(0.0, 10_000_000.0),
            LimitKind::Simulations => Bounds::new(100.0, 10_000.0),
            LimitKind::Rate => Bounds::new(-0.1, 0.15),
        }
    }
}

/// A validated numeric field of [`SimulationParameters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    StartingPortfolio,
    PlanningHorizon,
    Age,
    Expenses,
    Income,
    BenefitAmount,
    NumSimulations,
    InflationRate,
    ExpenseGrowthRate,
    IncomeGrowthRate,
}

impl InputField {
    #[must_use]
    pub const fn limit_kind(self) -> LimitKind {
        match self {
            InputField::StartingPortfolio => LimitKind::Portfolio,
            InputField::PlanningHorizon => LimitKind::Horizon,
            InputField::Age => LimitKind::Age,
            InputField::Expenses => LimitKind::Expenses,
            InputField::Income | InputField::BenefitAmount => LimitKind::Income,
            InputField::NumSimulations => LimitKind::Simulations,
            InputField::InflationRate
            | InputField::ExpenseGrowthRate
            | InputField::IncomeGrowthRate => LimitKind::Rate,
        }
    }

    #[must_use]
    pub const fn bounds(self) -> Bounds {
        self.limit_kind().bounds()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InputField::StartingPortfolio => "starting_portfolio",
            InputField::PlanningHorizon => "planning_horizon",
            InputField::Age => "age",
            InputField::Expenses => "expenses",
            InputField::Income => "income",
            InputField::BenefitAmount => "benefit_amount",
            InputField::NumSimulations => "num_simulations",
            InputField::InflationRate => "inflation_rate",
            InputField::ExpenseGrowthRate => "expense_growth_rate",
            InputField::IncomeGrowthRate => "income_growth_rate",
        }
    }

    /// Check `value` against this field's bounds
    pub fn check(self, value: f64) -> Result<()> {
        let bounds = self.bounds();
        if value.is_nan() || !bounds.contains(value) {
            return Err(SimulationError::OutOfRange {
                field: self,
                value,
                min: bounds.min,
                max: bounds.max,
            });
        }
        Ok(())
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that allocation weights sum to 1.0 within [`ALLOCATION_TOLERANCE`]
pub fn validate_allocation(weights: &[f64]) -> Result<()> {
    let sum: f64 = weights.iter().sum();
    if weights.is_empty() || !sum.is_finite() || (sum - 1.0).abs() >= ALLOCATION_TOLERANCE {
        return Err(SimulationError::AllocationSum {
            sum,
            tolerance: ALLOCATION_TOLERANCE,
        });
    }
    Ok(())
}

/// Check a vector length against the asset-class count
pub fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(SimulationError::DimensionMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Check a matrix is `n × n`
pub fn check_square(field: &'static str, n: usize, matrix: &[Vec<f64>]) -> Result<()> {
    check_len(field, n, matrix.len())?;
    for row in matrix {
        check_len(field, n, row.len())?;
    }
    Ok(())
}

fn validate_schedule(field: InputField, schedule: &YearSchedule) -> Result<()> {
    field.check(schedule.default_value)?;
    for value in schedule.custom.values() {
        field.check(*value)?;
    }
    Ok(())
}

/// Check every entry of a market override is a finite number
pub fn check_finite<'a>(
    field: &'static str,
    values: impl IntoIterator<Item = &'a f64>,
) -> Result<()> {
    match values.into_iter().position(|v| !v.is_finite()) {
        Some(index) => Err(SimulationError::NonFinite { field, index }),
        None => Ok(()),
    }
}

/// Check a correlation matrix is symmetric within [`SYMMETRY_TOLERANCE`]
pub fn check_symmetric(matrix: &[Vec<f64>]) -> Result<()> {
    for (i, row) in matrix.iter().enumerate() {
        for (j, value) in row.iter().enumerate().skip(i + 1) {
            let mirrored = matrix.get(j).and_then(|r| r.get(i)).copied();
            let symmetric = mirrored.is_some_and(|m| (value - m).abs() <= SYMMETRY_TOLERANCE);
            if !symmetric {
                return Err(SimulationError::InvalidCorrelation {
                    reason: "correlation matrix is not symmetric",
                });
            }
        }
    }
    Ok(())
}

/// Validate every bounded field, the allocation and the market overrides
pub fn validate_parameters(params: &SimulationParameters) -> Result<()> {
    InputField::StartingPortfolio.check(params.starting_portfolio)?;
    InputField::PlanningHorizon.check(params.planning_horizon as f64)?;
    InputField::Age.check(f64::from(params.age))?;
    validate_schedule(InputField::Expenses, &params.expenses)?;
    validate_schedule(InputField::Income, &params.income)?;
    InputField::BenefitAmount.check(params.benefit_amount)?;
    InputField::NumSimulations.check(params.num_simulations as f64)?;
    InputField::InflationRate.check(params.inflation_rate)?;
    InputField::ExpenseGrowthRate.check(params.expense_growth_rate)?;
    InputField::IncomeGrowthRate.check(params.income_growth_rate)?;

    validate_allocation(&params.allocation_weights())?;

    let n = AssetClass::COUNT;
    if let Some(means) = params.mean_returns.as_override() {
        check_len("mean_returns", n, means.len())?;
        check_finite("mean_returns", means)?;
    }
    if let Some(volatility) = params.volatility.as_override() {
        check_len("volatility", n, volatility.len())?;
        check_finite("volatility", volatility)?;
    }
    if let Some(matrix) = params.correlation_matrix.as_override() {
        check_square("correlation_matrix", n, matrix)?;
        check_finite("correlation_matrix", matrix.iter().flatten())?;
        check_symmetric(matrix)?;
    }
    Ok(())
}
