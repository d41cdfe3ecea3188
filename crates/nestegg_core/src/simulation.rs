//! Monte Carlo portfolio paths
//!
//! Every path starts from the same portfolio value and applies, year by year,
//! one sampled return followed by that year's net cash flow. A path that
//! reaches zero stays at zero.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimulationParameters;
use crate::error::{Result, SimulationError};
use crate::model::{PortfolioPathMatrix, SimulationProgress};
use crate::nominal::yearly_net_cashflows;
use crate::returns::CorrelatedReturnSampler;

/// Smallest number of paths handed to one rayon task
#[cfg(feature = "parallel")]
const MIN_PATHS_PER_TASK: usize = 16;

/// RNG for one path, independent of which thread runs it
#[must_use]
pub fn path_rng(run_seed: u64, path: usize) -> SmallRng {
    SmallRng::seed_from_u64(run_seed ^ path as u64)
}

/// Run one trajectory over the precomputed yearly `cashflows`
pub fn simulate_path<R: Rng + ?Sized>(
    params: &SimulationParameters,
    sampler: &CorrelatedReturnSampler,
    cashflows: &[f64],
    rng: &mut R,
) -> Vec<f64> {
    let mut values = Vec::with_capacity(cashflows.len());
    let mut value = params.starting_portfolio;
    let mut depleted = false;

    for cashflow in cashflows {
        if depleted {
            values.push(0.0);
            continue;
        }
        value = sampler.sample_return(value, rng);
        value = (value - cashflow).max(0.0);
        depleted = value <= 0.0;
        values.push(value);
    }

    values
}

/// Run every path and collect them into a matrix
pub fn simulate(params: &SimulationParameters) -> Result<PortfolioPathMatrix> {
    simulate_with_progress(params, &SimulationProgress::new())
}

/// [`simulate`] with a shared progress counter and cancellation flag.
///
/// The flag is checked before each path starts. On cancellation the matrix
/// keeps the leading run of completed paths; if none finished the result is
/// [`SimulationError::Cancelled`].
pub fn simulate_with_progress(
    params: &SimulationParameters,
    progress: &SimulationProgress,
) -> Result<PortfolioPathMatrix> {
    params.validate()?;

    let sampler = CorrelatedReturnSampler::new(params)?;
    let cashflows = yearly_net_cashflows(params);
    let run_seed = params.seed.unwrap_or_else(rand::random);
    let paths = params.num_simulations;
    let years = params.planning_horizon;

    tracing::info!(paths, years, seed = run_seed, "starting simulation");

    let run_path = |path: usize| -> Option<Vec<f64>> {
        if progress.is_cancelled() {
            return None;
        }
        let mut rng = path_rng(run_seed, path);
        let row = simulate_path(params, &sampler, &cashflows, &mut rng);
        progress.increment();
        Some(row)
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Option<Vec<f64>>> = (0..paths)
        .into_par_iter()
        .with_min_len(MIN_PATHS_PER_TASK)
        .map(run_path)
        .collect();

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Option<Vec<f64>>> = (0..paths).map(run_path).collect();

    let completed: Vec<Vec<f64>> = rows.into_iter().map_while(|row| row).collect();

    if completed.len() < paths {
        if completed.is_empty() {
            tracing::info!(paths, "simulation cancelled before any path finished");
            return Err(SimulationError::Cancelled);
        }
        tracing::info!(
            completed = completed.len(),
            paths,
            "simulation cancelled, keeping completed paths"
        );
    } else {
        tracing::debug!(paths, "simulation finished");
    }

    Ok(PortfolioPathMatrix::from_rows(years, completed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParametersBuilder;

    #[test]
    fn test_matrix_shape() {
        let params = ParametersBuilder::new()
            .years(15)
            .simulations(200)
            .seed(1)
            .build()
            .unwrap();
        let matrix = simulate(&params).unwrap();
        assert_eq!(matrix.rows(), 200);
        assert_eq!(matrix.years(), 15);
        assert!(matrix.iter_rows().flatten().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_invalid_parameters_fail_before_running() {
        let params = SimulationParameters::default().with_num_simulations(5);
        let progress = SimulationProgress::new();
        assert!(simulate_with_progress(&params, &progress).is_err());
        assert_eq!(progress.completed(), 0);
    }

    #[test]
    fn test_cancel_before_start() {
        let params = SimulationParameters::default().with_seed(3);
        let progress = SimulationProgress::new();
        progress.cancel();
        assert_eq!(
            simulate_with_progress(&params, &progress),
            Err(SimulationError::Cancelled)
        );
    }

    #[test]
    fn test_path_rng_differs_per_path() {
        let mut a = path_rng(9, 0);
        let mut b = path_rng(9, 1);
        assert_ne!(a.random::<u64>(), b.random::<u64>());
    }

    #[test]
    fn test_first_year_cashflow_applies_to_empty_start() {
        let params = ParametersBuilder::new()
            .starting_portfolio(0.0)
            .fixed_return(0.0)
            .build_unchecked();
        let sampler = CorrelatedReturnSampler::new(&params).unwrap();
        let mut rng = path_rng(0, 0);
        let row = simulate_path(&params, &sampler, &[-1_000.0, -1_000.0], &mut rng);
        assert_eq!(row, vec![1_000.0, 2_000.0]);
    }

    #[test]
    fn test_depleted_path_stays_at_zero_despite_income() {
        let params = ParametersBuilder::new()
            .starting_portfolio(100.0)
            .fixed_return(0.0)
            .build_unchecked();
        let sampler = CorrelatedReturnSampler::new(&params).unwrap();
        // withdraw everything, then large contributions
        let cashflows = [500.0, -1_000.0, -1_000.0];
        let mut rng = path_rng(0, 0);
        let row = simulate_path(&params, &sampler, &cashflows, &mut rng);
        assert_eq!(row, vec![0.0, 0.0, 0.0]);
    }
}
