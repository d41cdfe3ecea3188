//! Period summaries over the daily ledger
//!
//! A single forward pass: a new period opens at the first entry and at every
//! entry that falls outside the open period's window. Input must be sorted by
//! date with no gaps.

use jiff::civil::Date;

use crate::cash_flows::round_cents;
use crate::date_math::{fast_days_between, quarter};
use crate::model::{AggregatedPeriod, DailyEntry, Period};

/// Whether `date` belongs to the period that opened on `period_start`
fn in_period(date: Date, period: Period, period_start: Date) -> bool {
    match period {
        Period::Weekly => (0..7).contains(&fast_days_between(period_start, date)),
        Period::Monthly => {
            date.year() == period_start.year() && date.month() == period_start.month()
        }
        Period::Quarterly => {
            date.year() == period_start.year() && quarter(date) == quarter(period_start)
        }
        Period::Annual => date.year() == period_start.year(),
    }
}

struct OpenPeriod {
    start: Date,
    end: Date,
    revenue: f64,
    expense: f64,
    net: f64,
}

impl OpenPeriod {
    fn open(entry: &DailyEntry) -> Self {
        Self {
            start: entry.date,
            end: entry.date,
            revenue: 0.0,
            expense: 0.0,
            net: 0.0,
        }
    }

    fn fold(&mut self, entry: &DailyEntry) {
        self.revenue += entry.total_revenue;
        self.expense += entry.total_expense;
        self.net += entry.net;
        self.end = entry.date;
    }

    fn close(self, period: Period) -> AggregatedPeriod {
        AggregatedPeriod {
            period: period.label().to_string(),
            start_date: self.start,
            end_date: self.end,
            total_revenue: round_cents(self.revenue),
            total_expense: round_cents(self.expense),
            net: round_cents(self.net),
        }
    }
}

/// Group `daily` into calendar periods and sum each group
pub fn aggregate(daily: &[DailyEntry], period: Period) -> Vec<AggregatedPeriod> {
    let mut periods = Vec::new();
    let mut open: Option<OpenPeriod> = None;

    for entry in daily {
        let current = match open.take() {
            Some(current) if in_period(entry.date, period, current.start) => current,
            Some(finished) => {
                periods.push(finished.close(period));
                OpenPeriod::open(entry)
            }
            None => OpenPeriod::open(entry),
        };
        let current = open.insert(current);
        current.fold(entry);
    }

    if let Some(last) = open {
        periods.push(last.close(period));
    }

    periods
}
