//! Pure summaries derived from the full transaction sequence.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::Serialize;

use gofinances_domain::{AggregationWindow, CategoryCatalog, TransactionRecord, TransactionType};

/// Running totals per transaction direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub outcome: Decimal,
    pub balance: Decimal,
}

/// One slice of the monthly expense breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdownEntry {
    pub key: String,
    pub name: String,
    pub color: String,
    pub total: Decimal,
    /// Share of the month's matched expenses, rounded half away from zero.
    pub percent: u32,
}

/// Sums income and expense amounts. `balance = income - outcome`.
pub fn totals_by_type(records: &[TransactionRecord]) -> Totals {
    let (income, outcome) = records.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, outcome), record| match record.kind {
            TransactionType::Positive => (accumulate(income, record.amount), outcome),
            TransactionType::Negative => (income, accumulate(outcome, record.amount)),
        },
    );
    Totals {
        income,
        outcome,
        balance: income - outcome,
    }
}

/// Latest `date` among records matching `kind` (all records when `None`).
pub fn last_transaction_date(
    records: &[TransactionRecord],
    kind: Option<TransactionType>,
) -> Option<DateTime<Utc>> {
    records
        .iter()
        .filter(|record| kind.map_or(true, |wanted| record.kind == wanted))
        .map(|record| record.date)
        .max()
}

/// Expense totals per catalog category for `window`, in catalog order.
///
/// Records whose category is missing from the catalog are left out of both the
/// per-category totals and the grand total. Categories with nothing spent are
/// omitted; an empty month yields an empty breakdown.
pub fn category_breakdown(
    records: &[TransactionRecord],
    window: &AggregationWindow,
    catalog: &CategoryCatalog,
) -> Vec<CategoryBreakdownEntry> {
    let mut sums: HashMap<&str, Decimal> = HashMap::new();
    let mut unmatched = 0usize;
    for record in records
        .iter()
        .filter(|record| record.is_expense() && window.contains(record.date))
    {
        if catalog.contains(&record.category) {
            let sum = sums.entry(record.category.as_str()).or_default();
            *sum = accumulate(*sum, record.amount);
        } else {
            unmatched += 1;
        }
    }
    if unmatched > 0 {
        tracing::debug!(%window, unmatched, "expenses with unknown categories skipped");
    }

    let grand_total = sums.values().copied().fold(Decimal::ZERO, accumulate);
    if grand_total.is_zero() {
        return Vec::new();
    }

    catalog
        .iter()
        .filter_map(|category| {
            let total = sums.get(category.key.as_str()).copied()?;
            if total.is_zero() {
                return None;
            }
            Some(CategoryBreakdownEntry {
                key: category.key.clone(),
                name: category.name.clone(),
                color: category.color.clone(),
                total,
                percent: percent_of(total, grand_total),
            })
        })
        .collect()
}

/// Adds without panicking; a sum past `Decimal::MAX` is clamped there.
fn accumulate(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        tracing::warn!(%total, %amount, "amount sum overflowed, clamping");
        Decimal::MAX
    })
}

fn percent_of(part: Decimal, whole: Decimal) -> u32 {
    (part / whole * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}
