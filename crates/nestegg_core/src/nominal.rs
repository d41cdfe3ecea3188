//! Present-value to nominal conversion and the yearly cash-flow schedule
//!
//! Schedules are specified in today's dollars. Each growth rate already
//! includes inflation, so every value is compounded by `(1 + rate)^year`
//! whichever branch produced its present value.

use std::collections::BTreeMap;

use crate::config::{SimulationParameters, YearSchedule};

#[inline]
fn compound(rate: f64, year: u32) -> f64 {
    (1.0 + rate).powi(year as i32)
}

/// Nominal amount for `year` given per-year present values.
///
/// - no custom values, a year before the first custom year, or any missing
///   year with interpolation off: `default_value`
/// - a year with its own custom value: that value
/// - after the last custom year (interpolating): the last custom value
/// - between two custom years (interpolating): linear interpolation
///
/// The chosen present value is then compounded at `growth_rate`.
pub fn to_nominal(
    year: u32,
    custom: &BTreeMap<u32, f64>,
    default_value: f64,
    growth_rate: f64,
    interpolate: bool,
) -> f64 {
    present_value(year, custom, default_value, interpolate) * compound(growth_rate, year)
}

fn present_value(
    year: u32,
    custom: &BTreeMap<u32, f64>,
    default_value: f64,
    interpolate: bool,
) -> f64 {
    if let Some(value) = custom.get(&year) {
        return *value;
    }
    if !interpolate {
        return default_value;
    }

    let (Some((&first, _)), Some((_, &last_value))) =
        (custom.first_key_value(), custom.last_key_value())
    else {
        return default_value;
    };
    if year < first {
        return default_value;
    }

    match (custom.range(..year).next_back(), custom.range(year..).next()) {
        (Some((&lo, &lo_value)), Some((&hi, &hi_value))) => {
            let t = f64::from(year - lo) / f64::from(hi - lo);
            lo_value + (hi_value - lo_value) * t
        }
        _ => last_value,
    }
}

/// Nominal value of a [`YearSchedule`] in `year`
pub fn schedule_nominal(schedule: &YearSchedule, year: u32, growth_rate: f64) -> f64 {
    to_nominal(
        year,
        &schedule.custom,
        schedule.default_value,
        growth_rate,
        schedule.interpolate,
    )
}

/// Fixed benefit paid in `year`, zero before the eligibility age.
///
/// The benefit is stated in today's dollars and inflated at the inflation
/// rate, not the income growth rate.
pub fn benefit(year: u32, params: &SimulationParameters) -> f64 {
    if params.age_in_year(year) >= params.benefit_age {
        params.benefit_amount * compound(params.inflation_rate, year)
    } else {
        0.0
    }
}

/// Nominal income in `year`, benefit included
pub fn income(year: u32, params: &SimulationParameters) -> f64 {
    schedule_nominal(&params.income, year, params.income_growth_rate) + benefit(year, params)
}

/// Nominal expenses in `year`
pub fn expense(year: u32, params: &SimulationParameters) -> f64 {
    schedule_nominal(&params.expenses, year, params.expense_growth_rate)
}

/// Net amount drawn from the portfolio in `year`.
///
/// Positive means a withdrawal, negative a contribution.
pub fn net_cashflow(year: u32, params: &SimulationParameters) -> f64 {
    expense(year, params) - income(year, params)
}

/// [`net_cashflow`] for every simulated year
pub fn yearly_net_cashflows(params: &SimulationParameters) -> Vec<f64> {
    (0..params.planning_horizon as u32)
        .map(|year| net_cashflow(year, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_no_custom_values_compounds_default() {
        let custom = BTreeMap::new();
        let expected = 50_000.0 * 1.02f64.powi(10);
        assert!(approx(to_nominal(10, &custom, 50_000.0, 0.02, true), expected));
        assert_eq!(to_nominal(0, &custom, 50_000.0, 0.02, false), 50_000.0);
    }

    #[test]
    fn test_explicit_year_value_is_compounded() {
        let custom = BTreeMap::from([(5, 80_000.0)]);
        let expected = 80_000.0 * 1.03f64.powi(5);
        assert!(approx(to_nominal(5, &custom, 50_000.0, 0.03, false), expected));
    }

    #[test]
    fn test_missing_year_without_interpolation_uses_default() {
        let custom = BTreeMap::from([(2, 10.0), (6, 20.0)]);
        assert_eq!(to_nominal(4, &custom, 100.0, 0.0, false), 100.0);
        assert_eq!(to_nominal(9, &custom, 100.0, 0.0, false), 100.0);
    }

    #[test]
    fn test_interpolation_branches() {
        let custom = BTreeMap::from([(2, 10.0), (6, 20.0)]);
        // before first custom year
        assert_eq!(to_nominal(1, &custom, 100.0, 0.0, true), 100.0);
        // between
        assert!(approx(to_nominal(3, &custom, 100.0, 0.0, true), 12.5));
        assert!(approx(to_nominal(5, &custom, 100.0, 0.0, true), 17.5));
        // after last, held flat then compounded
        assert_eq!(to_nominal(9, &custom, 100.0, 0.0, true), 20.0);
        assert!(approx(to_nominal(9, &custom, 100.0, 0.1, true), 20.0 * 1.1f64.powi(9)));
    }

    #[test]
    fn test_benefit_step() {
        let params = SimulationParameters {
            age: 65,
            benefit_age: 67,
            benefit_amount: 30_000.0,
            inflation_rate: 0.0,
            expense_growth_rate: 0.0,
            income_growth_rate: 0.0,
            expenses: YearSchedule::flat(50_000.0),
            income: YearSchedule::flat(0.0),
            ..Default::default()
        };
        assert_eq!(net_cashflow(1, &params), 50_000.0);
        assert_eq!(net_cashflow(2, &params), 20_000.0);
        assert_eq!(net_cashflow(3, &params), 20_000.0);
    }

    #[test]
    fn test_benefit_uses_inflation_not_income_growth() {
        let params = SimulationParameters {
            age: 65,
            benefit_age: 67,
            benefit_amount: 30_000.0,
            inflation_rate: 0.02,
            expense_growth_rate: 0.02,
            income_growth_rate: 0.10,
            expenses: YearSchedule::flat(50_000.0),
            income: YearSchedule::flat(0.0),
            ..Default::default()
        };
        let expected = 50_000.0 * 1.02f64.powi(10) - 30_000.0 * 1.02f64.powi(10);
        assert!((net_cashflow(10, &params) - expected).abs() < 0.01);
    }

    #[test]
    fn test_yearly_net_cashflows_length() {
        let params = SimulationParameters {
            planning_horizon: 12,
            ..Default::default()
        };
        assert_eq!(yearly_net_cashflows(&params).len(), 12);
    }
}
