use std::fmt;

use jiff::civil::Date;

use crate::validation::InputField;

/// Errors raised while building or expanding a cash-flow projection
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Projection end date precedes its start date
    InvalidHorizon { start: Date, end: Date },
    /// Recurrence keyword outside daily/weekly/monthly/quarterly/annual
    UnsupportedFrequency(String),
    /// Aggregation keyword outside weekly/monthly/quarterly/annual
    UnsupportedAggregationPeriod(String),
    /// A transaction definition breaks one of its construction rules
    InvalidTransaction { name: String, reason: &'static str },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::InvalidHorizon { start, end } => {
                write!(f, "projection end date {end} is before start date {start}")
            }
            ProjectionError::UnsupportedFrequency(keyword) => {
                write!(f, "unsupported frequency: {keyword:?}")
            }
            ProjectionError::UnsupportedAggregationPeriod(keyword) => {
                write!(f, "unsupported aggregation period: {keyword:?}")
            }
            ProjectionError::InvalidTransaction { name, reason } => {
                write!(f, "invalid transaction {name:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ProjectionError {}

/// Errors related to simulation inputs and the return model
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Asset allocation weights do not sum to 1.0 within `tolerance`
    AllocationSum { sum: f64, tolerance: f64 },
    /// A supplied vector or matrix disagrees with the asset-class count
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A numeric input falls outside its declared bound
    OutOfRange {
        field: InputField,
        value: f64,
        min: f64,
        max: f64,
    },
    /// A market override entry is NaN or infinite; `index` is row-major for matrices
    NonFinite { field: &'static str, index: usize },
    /// The correlation matrix is asymmetric or its covariance is not positive semi-definite
    InvalidCorrelation { reason: &'static str },
    /// Simulation was cancelled before any path completed
    Cancelled,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::AllocationSum { sum, tolerance } => write!(
                f,
                "asset allocation must sum to 1.0 (±{tolerance}), got {:.2}%",
                sum * 100.0
            ),
            SimulationError::DimensionMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{field} has {actual} entries but {expected} asset classes are configured"
            ),
            SimulationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                if field.bounds().min_exclusive {
                    write!(
                        f,
                        "{field} must be greater than {min} and at most {max}, got {value}"
                    )
                } else {
                    write!(f, "{field} must be between {min} and {max}, got {value}")
                }
            }
            SimulationError::NonFinite { field, index } => {
                write!(f, "{field} entry {index} is not a finite number")
            }
            SimulationError::InvalidCorrelation { reason } => {
                write!(f, "invalid correlation matrix: {reason}")
            }
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {}

pub type Result<T, E = SimulationError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_offending_values() {
        let err = SimulationError::DimensionMismatch {
            field: "correlation_matrix",
            expected: 6,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "correlation_matrix has 2 entries but 6 asset classes are configured"
        );

        let err = SimulationError::OutOfRange {
            field: InputField::Age,
            value: 120.0,
            min: 10.0,
            max: 100.0,
        };
        assert_eq!(err.to_string(), "age must be between 10 and 100, got 120");

        let err = ProjectionError::InvalidHorizon {
            start: jiff::civil::date(2025, 2, 1),
            end: jiff::civil::date(2025, 1, 1),
        };
        assert!(err.to_string().contains("2025-01-01"));
    }
}
