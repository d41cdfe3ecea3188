//! Transaction expansion into a daily ledger
//!
//! Each transaction is clipped to the projection horizon and its occurrences
//! are added into a per-day array indexed by day offset from the horizon
//! start. Revenues and expenses are accumulated into separate arrays so the
//! daily ledger can report both totals; overlapping transactions add up.

use crate::aggregate::aggregate;
use crate::date_math::add_days;
use crate::error::ProjectionError;
use crate::model::{
    CashFlowProjection, DailyEntry, Horizon, Period, ProjectionRequest, Transaction,
    TransactionKind,
};

/// Direction a transaction moves money
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Revenue,
    Expense,
}

impl Sign {
    #[inline]
    pub fn multiplier(self) -> f64 {
        match self {
            Sign::Revenue => 1.0,
            Sign::Expense => -1.0,
        }
    }
}

/// Round to whole cents
#[inline]
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Add every occurrence of `transaction` inside `horizon` into `ledger`.
///
/// `ledger` holds one slot per horizon day. The transaction's window is
/// clipped to the horizon; a one-time transaction lands on the first day of
/// its clipped window, a repeating one on every step from there through the
/// clipped end. Occurrences that fall outside `ledger` are ignored.
pub fn expand_transaction(
    transaction: &Transaction,
    horizon: &Horizon,
    sign: Sign,
    ledger: &mut [f64],
) {
    let effective_start = transaction.start_date().max(horizon.start());
    let effective_end = transaction
        .end_date()
        .unwrap_or(horizon.end())
        .min(horizon.end());

    if effective_start > effective_end {
        return;
    }

    let amount = transaction.amount() * sign.multiplier();
    let mut add = |date| {
        if let Some(slot) = horizon.index_of(date).and_then(|i| ledger.get_mut(i)) {
            *slot += amount;
        }
    };

    match transaction.kind() {
        TransactionKind::OneTime => add(effective_start),
        TransactionKind::Repeating(frequency) => {
            let mut current = effective_start;
            while current <= effective_end {
                add(current);
                match frequency.next_date(current) {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
    }
}

/// Build the daily ledger for `revenues` and `expenses` over `horizon`
pub fn daily_ledger(
    revenues: &[Transaction],
    expenses: &[Transaction],
    horizon: &Horizon,
) -> Vec<DailyEntry> {
    let days = horizon.num_days();
    let mut revenue_by_day = vec![0.0; days];
    let mut expense_by_day = vec![0.0; days];

    for transaction in revenues {
        expand_transaction(transaction, horizon, Sign::Revenue, &mut revenue_by_day);
    }
    for transaction in expenses {
        expand_transaction(transaction, horizon, Sign::Expense, &mut expense_by_day);
    }

    revenue_by_day
        .into_iter()
        .zip(expense_by_day)
        .enumerate()
        .map(|(offset, (revenue, expense))| DailyEntry {
            date: add_days(horizon.start(), offset as i32),
            total_revenue: round_cents(revenue),
            total_expense: round_cents(expense.abs()),
            net: round_cents(revenue + expense),
        })
        .collect()
}

/// Project a request into its daily ledger and every period summary
pub fn project(request: &ProjectionRequest) -> Result<CashFlowProjection, ProjectionError> {
    let horizon = request.horizon()?;
    tracing::debug!(
        days = horizon.num_days(),
        revenues = request.revenues.len(),
        expenses = request.expenses.len(),
        "projecting cash flow"
    );

    let daily = daily_ledger(&request.revenues, &request.expenses, &horizon);

    Ok(CashFlowProjection {
        weekly: aggregate(&daily, Period::Weekly),
        monthly: aggregate(&daily, Period::Monthly),
        quarterly: aggregate(&daily, Period::Quarterly),
        annual: aggregate(&daily, Period::Annual),
        daily,
    })
}
