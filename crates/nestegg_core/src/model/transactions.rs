//! Transaction definitions for the cash-flow projection
//!
//! A transaction is either a one-time amount or a repeating one with a
//! [`Frequency`]. The kind carries the frequency, so a repeating transaction
//! without a frequency (or a one-time one with a frequency) cannot be built.
//! The serialized form keeps the flat `kind` + `frequency` shape and is
//! checked on the way in.

use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math::{add_months, checked_add_days};
use crate::error::ProjectionError;

/// How often a repeating transaction recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Annual,
    ];

    /// The occurrence after `date`.
    ///
    /// Month-based steps clamp to the end of shorter months and continue from
    /// the clamped date. Returns `None` past the end of the calendar.
    #[must_use]
    pub fn next_date(self, date: Date) -> Option<Date> {
        match self {
            Frequency::Daily => checked_add_days(date, 1),
            Frequency::Weekly => checked_add_days(date, 7),
            Frequency::Monthly => add_months(date, 1),
            Frequency::Quarterly => add_months(date, 3),
            Frequency::Annual => add_months(date, 12),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annual => "annual",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = s.trim().to_ascii_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|f| f.as_str() == keyword)
            .ok_or_else(|| ProjectionError::UnsupportedFrequency(s.to_string()))
    }
}

/// Whether a transaction happens once or on a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    OneTime,
    Repeating(Frequency),
}

impl TransactionKind {
    #[must_use]
    pub fn frequency(self) -> Option<Frequency> {
        match self {
            TransactionKind::OneTime => None,
            TransactionKind::Repeating(frequency) => Some(frequency),
        }
    }
}

/// A named revenue or expense definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord", into = "TransactionRecord")]
pub struct Transaction {
    name: String,
    amount: f64,
    kind: TransactionKind,
    start_date: Date,
    end_date: Option<Date>,
}

impl Transaction {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        start_date: Date,
        end_date: Option<Date>,
    ) -> Result<Self, ProjectionError> {
        let name = name.into();
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ProjectionError::InvalidTransaction {
                name,
                reason: "amount must be a positive number",
            });
        }
        if end_date.is_some_and(|end| end < start_date) {
            return Err(ProjectionError::InvalidTransaction {
                name,
                reason: "end_date cannot be before start_date",
            });
        }
        Ok(Self {
            name,
            amount,
            kind,
            start_date,
            end_date,
        })
    }

    pub fn one_time(
        name: impl Into<String>,
        amount: f64,
        date: Date,
    ) -> Result<Self, ProjectionError> {
        Self::new(name, amount, TransactionKind::OneTime, date, None)
    }

    pub fn repeating(
        name: impl Into<String>,
        amount: f64,
        frequency: Frequency,
        start_date: Date,
        end_date: Option<Date>,
    ) -> Result<Self, ProjectionError> {
        Self::new(
            name,
            amount,
            TransactionKind::Repeating(frequency),
            start_date,
            end_date,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn start_date(&self) -> Date {
        self.start_date
    }

    pub fn end_date(&self) -> Option<Date> {
        self.end_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum KindTag {
    OneTime,
    Repeating,
}

/// Flat on-disk shape of a [`Transaction`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransactionRecord {
    name: String,
    amount: f64,
    #[serde(rename = "type", alias = "kind")]
    kind: KindTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency: Option<Frequency>,
    start_date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_date: Option<Date>,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = ProjectionError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let kind = match (record.kind, record.frequency) {
            (KindTag::OneTime, None) => TransactionKind::OneTime,
            (KindTag::Repeating, Some(frequency)) => TransactionKind::Repeating(frequency),
            (KindTag::OneTime, Some(_)) => {
                return Err(ProjectionError::InvalidTransaction {
                    name: record.name,
                    reason: "frequency should not be set for one-time transactions",
                });
            }
            (KindTag::Repeating, None) => {
                return Err(ProjectionError::InvalidTransaction {
                    name: record.name,
                    reason: "frequency is required for repeating transactions",
                });
            }
        };
        Transaction::new(
            record.name,
            record.amount,
            kind,
            record.start_date,
            record.end_date,
        )
    }
}

impl From<Transaction> for TransactionRecord {
    fn from(t: Transaction) -> Self {
        let (kind, frequency) = match t.kind {
            TransactionKind::OneTime => (KindTag::OneTime, None),
            TransactionKind::Repeating(frequency) => (KindTag::Repeating, Some(frequency)),
        };
        TransactionRecord {
            name: t.name,
            amount: t.amount,
            kind,
            frequency,
            start_date: t.start_date,
            end_date: t.end_date,
        }
    }
}
