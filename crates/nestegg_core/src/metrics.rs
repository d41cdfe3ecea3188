//! Summary statistics over a path matrix

use crate::config::SimulationParameters;
use crate::error::Result;
use crate::model::{PortfolioPathMatrix, SimulationProgress, SimulationSummary};
use crate::simulation::simulate_with_progress;

/// Tolerance for floating-point percentile comparison
pub const PERCENTILE_TOLERANCE: f64 = 0.001;

/// Percentiles reported for the final-year distribution
pub const SUMMARY_PERCENTILES: [f64; 3] = [0.05, 0.50, 0.95];

/// Share of paths that hit zero in any year. Zero rows gives 0.0.
pub fn depletion_risk(matrix: &PortfolioPathMatrix) -> f64 {
    let rows = matrix.rows();
    if rows == 0 {
        return 0.0;
    }
    let depleted = matrix
        .iter_rows()
        .filter(|row| row.iter().any(|v| *v <= 0.0))
        .count();
    depleted as f64 / rows as f64
}

/// Linear-interpolated percentile of already sorted values, `p` in `[0, 1]`
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let t = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * t
        }
    }
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}

pub fn median(values: Vec<f64>) -> f64 {
    percentile_of_sorted(&sorted(values), 0.5)
}

/// `(percentile, value)` pairs for each of `percentiles`
pub fn percentiles(values: Vec<f64>, percentiles: &[f64]) -> Vec<(f64, f64)> {
    let values = sorted(values);
    percentiles
        .iter()
        .map(|p| (*p, percentile_of_sorted(&values, *p)))
        .collect()
}

/// Find a percentile value from a slice of (percentile, value) pairs
#[inline]
pub fn find_percentile_value(values: &[(f64, f64)], target: f64) -> Option<f64> {
    values
        .iter()
        .find(|(p, _)| (*p - target).abs() < PERCENTILE_TOLERANCE)
        .map(|(_, v)| *v)
}

/// Risk, median and percentile bands of a finished run
#[must_use]
pub fn summarize(path_matrix: PortfolioPathMatrix) -> SimulationSummary {
    let final_values = path_matrix.final_values();
    let final_percentiles = percentiles(final_values, &SUMMARY_PERCENTILES);
    let median_final_value = find_percentile_value(&final_percentiles, 0.50).unwrap_or(0.0);
    let yearly_median = (0..path_matrix.years())
        .map(|year| median(path_matrix.column(year)))
        .collect();

    SimulationSummary {
        risk_of_depletion: depletion_risk(&path_matrix),
        median_final_value,
        final_percentiles,
        yearly_median,
        path_matrix,
    }
}

/// Simulate and summarize in one call
pub fn run(params: &SimulationParameters) -> Result<SimulationSummary> {
    run_with_progress(params, &SimulationProgress::new())
}

pub fn run_with_progress(
    params: &SimulationParameters,
    progress: &SimulationProgress,
) -> Result<SimulationSummary> {
    let matrix = simulate_with_progress(params, progress)?;
    let summary = summarize(matrix);
    tracing::debug!(
        risk = summary.risk_of_depletion,
        median = summary.median_final_value,
        "simulation summarized"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depletion_risk_counts_any_zero() {
        let m = PortfolioPathMatrix::from_rows(
            3,
            vec![
                vec![10.0, 5.0, 1.0],
                vec![10.0, 0.0, 0.0],
                vec![1.0, 2.0, 3.0],
                vec![0.0, 0.0, 0.0],
            ],
        );
        assert_eq!(depletion_risk(&m), 0.5);
    }

    #[test]
    fn test_depletion_risk_empty_matrix() {
        assert_eq!(depletion_risk(&PortfolioPathMatrix::empty(30)), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile_of_sorted(&values, 0.5), 2.5);
        assert_eq!(percentile_of_sorted(&values, 0.0), 1.0);
        assert_eq!(percentile_of_sorted(&values, 1.0), 4.0);
        assert_eq!(median(vec![5.0, 1.0, 3.0]), 3.0);
    }

    #[test]
    fn test_summarize_reports_bands() {
        let rows = (0..101).map(|i| vec![100.0, i as f64]);
        let summary = summarize(PortfolioPathMatrix::from_rows(2, rows));
        assert_eq!(summary.median_final_value, 50.0);
        assert_eq!(find_percentile_value(&summary.final_percentiles, 0.05), Some(5.0));
        assert_eq!(find_percentile_value(&summary.final_percentiles, 0.95), Some(95.0));
        assert_eq!(summary.yearly_median, vec![100.0, 50.0]);
        // the single row with a zero final value
        assert!((summary.risk_of_depletion - 1.0 / 101.0).abs() < 1e-12);
    }
}
