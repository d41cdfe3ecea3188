//! Simulation results and progress tracking
//!
//! Contains the path matrix produced by a Monte Carlo run, the summary
//! derived from it, and the shared progress handle callers use to observe
//! or cancel a run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Portfolio values for every simulated path, one row per path and one column per year.
///
/// Stored row-major. Values are nominal and floored at zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioPathMatrix {
    years: usize,
    values: Vec<f64>,
}

impl PortfolioPathMatrix {
    /// Matrix with no rows and `years` columns
    #[must_use]
    pub fn empty(years: usize) -> Self {
        Self {
            years,
            values: Vec::new(),
        }
    }

    /// Build from complete rows. Every row must have `years` entries.
    #[must_use]
    pub fn from_rows(years: usize, rows: impl IntoIterator<Item = Vec<f64>>) -> Self {
        let mut values = Vec::new();
        for row in rows {
            debug_assert_eq!(row.len(), years);
            values.extend(row);
        }
        Self { years, values }
    }

    pub fn rows(&self) -> usize {
        if self.years == 0 {
            0
        } else {
            self.values.len() / self.years
        }
    }

    pub fn years(&self) -> usize {
        self.years
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn row(&self, path: usize) -> &[f64] {
        &self.values[path * self.years..(path + 1) * self.years]
    }

    pub fn get(&self, path: usize, year: usize) -> f64 {
        self.values[path * self.years + year]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.years.max(1))
    }

    /// Values of one year across every path
    pub fn column(&self, year: usize) -> Vec<f64> {
        self.iter_rows().map(|row| row[year]).collect()
    }

    /// Last-year value of every path
    pub fn final_values(&self) -> Vec<f64> {
        if self.years == 0 {
            return Vec::new();
        }
        self.column(self.years - 1)
    }

    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }
}

/// Headline numbers of a Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub risk_of_depletion: f64,
    pub median_final_value: f64,
    /// Final-year percentiles as (percentile, value) pairs, ascending
    pub final_percentiles: Vec<(f64, f64)>,
    /// Median portfolio value for every simulated year
    pub yearly_median: Vec<f64>,
    pub path_matrix: PortfolioPathMatrix,
}

/// Shared progress counter and cancellation flag for a running simulation
#[derive(Debug, Clone)]
pub struct SimulationProgress {
    completed: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl SimulationProgress {
    #[must_use]
    pub fn new() -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of paths finished so far
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for SimulationProgress {
    fn default() -> Self {
        Self::new()
    }
}
