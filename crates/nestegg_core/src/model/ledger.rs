//! Daily ledger and period summaries produced by the cash-flow projection

use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::transactions::Transaction;
use crate::date_math::fast_days_between;
use crate::error::ProjectionError;

/// Inclusive date range a projection covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HorizonRecord")]
pub struct Horizon {
    start: Date,
    end: Date,
}

#[derive(Deserialize)]
struct HorizonRecord {
    start: Date,
    end: Date,
}

impl TryFrom<HorizonRecord> for Horizon {
    type Error = ProjectionError;

    fn try_from(record: HorizonRecord) -> Result<Self, Self::Error> {
        Horizon::new(record.start, record.end)
    }
}

impl Horizon {
    pub fn new(start: Date, end: Date) -> Result<Self, ProjectionError> {
        if end < start {
            return Err(ProjectionError::InvalidHorizon { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// Number of calendar days in the horizon, both ends included
    pub fn num_days(&self) -> usize {
        fast_days_between(self.start, self.end) as usize + 1
    }

    /// Day offset of `date` from the horizon start, if it falls inside
    pub fn index_of(&self, date: Date) -> Option<usize> {
        if date < self.start || date > self.end {
            return None;
        }
        Some(fast_days_between(self.start, date) as usize)
    }
}

/// Revenue/expense totals for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: Date,
    pub total_revenue: f64,
    pub total_expense: f64,
    pub net: f64,
}

/// Calendar grouping for [`AggregatedPeriod`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::Weekly,
        Period::Monthly,
        Period::Quarterly,
        Period::Annual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Annual => "annual",
        }
    }

    /// Label written into each aggregated row
    pub fn label(self) -> &'static str {
        match self {
            Period::Weekly => "Weekly",
            Period::Monthly => "Monthly",
            Period::Quarterly => "Quarterly",
            Period::Annual => "Annual",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = s.trim().to_ascii_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == keyword)
            .ok_or_else(|| ProjectionError::UnsupportedAggregationPeriod(s.to_string()))
    }
}

/// Sums over one contiguous group of daily entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPeriod {
    pub period: String,
    pub start_date: Date,
    pub end_date: Date,
    pub total_revenue: f64,
    pub total_expense: f64,
    pub net: f64,
}

/// Input to a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    #[serde(default)]
    pub revenues: Vec<Transaction>,
    #[serde(default)]
    pub expenses: Vec<Transaction>,
    pub start_date: Date,
    pub end_date: Date,
}

impl ProjectionRequest {
    pub fn horizon(&self) -> Result<Horizon, ProjectionError> {
        Horizon::new(self.start_date, self.end_date)
    }
}

/// Daily ledger plus every period summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    pub daily: Vec<DailyEntry>,
    pub weekly: Vec<AggregatedPeriod>,
    pub monthly: Vec<AggregatedPeriod>,
    pub quarterly: Vec<AggregatedPeriod>,
    pub annual: Vec<AggregatedPeriod>,
}

impl CashFlowProjection {
    pub fn period(&self, period: Period) -> &[AggregatedPeriod] {
        match period {
            Period::Weekly => &self.weekly,
            Period::Monthly => &self.monthly,
            Period::Quarterly => &self.quarterly,
            Period::Annual => &self.annual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_horizon_rejects_reversed_dates() {
        let err = Horizon::new(date(2025, 2, 1), date(2025, 1, 31)).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidHorizon { .. }));
    }

    #[test]
    fn test_deserialized_horizon_is_checked() {
        let ok: Horizon =
            serde_json::from_str(r#"{"start": "2025-01-01", "end": "2025-01-31"}"#).unwrap();
        assert_eq!(ok.num_days(), 31);

        let reversed =
            serde_json::from_str::<Horizon>(r#"{"start": "2025-02-01", "end": "2025-01-31"}"#);
        let message = reversed.unwrap_err().to_string();
        assert!(message.contains("before start date"), "{message}");
    }

    #[test]
    fn test_horizon_indexing() {
        let h = Horizon::new(date(2024, 2, 27), date(2024, 3, 2)).unwrap();
        assert_eq!(h.num_days(), 5);
        assert_eq!(h.index_of(date(2024, 2, 29)), Some(2));
        assert_eq!(h.index_of(date(2024, 3, 3)), None);
        assert_eq!(h.index_of(date(2024, 2, 26)), None);
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("Quarterly".parse::<Period>(), Ok(Period::Quarterly));
        assert_eq!(
            "daily".parse::<Period>(),
            Err(ProjectionError::UnsupportedAggregationPeriod("daily".into()))
        );
    }
}
