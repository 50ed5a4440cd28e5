//! Display-ready views combining the aggregator with a formatter.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use gofinances_domain::{AggregationWindow, CategoryCatalog, TransactionRecord, TransactionType};

use crate::{
    aggregator::{self, CategoryBreakdownEntry, Totals},
    format::{CurrencyFormatter, DateFormatter, DatePattern},
};

/// One summary card: a total and when the latest matching entry happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightCard {
    pub total: Decimal,
    pub total_formatted: String,
    pub last_transaction: Option<DateTime<Utc>>,
    /// `None` when no record matched.
    pub last_transaction_formatted: Option<String>,
}

/// A transaction as rendered in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    pub id: Uuid,
    pub name: String,
    pub kind: TransactionType,
    pub amount_formatted: String,
    pub category: String,
    pub category_name: Option<String>,
    pub date_formatted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub totals: Totals,
    pub income: HighlightCard,
    pub outcome: HighlightCard,
    pub balance: HighlightCard,
    pub rows: Vec<TransactionRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeEntry {
    #[serde(flatten)]
    pub breakdown: CategoryBreakdownEntry,
    pub total_formatted: String,
    pub percent_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeSummary {
    pub year: i32,
    pub month: u32,
    pub entries: Vec<ResumeEntry>,
}

pub struct SummaryService;

impl SummaryService {
    /// Highlight cards plus list rows, in stored (append) order.
    pub fn dashboard<F>(
        records: &[TransactionRecord],
        catalog: &CategoryCatalog,
        formatter: &F,
    ) -> DashboardSummary
    where
        F: CurrencyFormatter + DateFormatter,
    {
        let totals = aggregator::totals_by_type(records);
        let card = |total: Decimal, kind: Option<TransactionType>| {
            let last = aggregator::last_transaction_date(records, kind);
            HighlightCard {
                total,
                total_formatted: formatter.format_amount(total),
                last_transaction: last,
                last_transaction_formatted: last
                    .map(|date| formatter.format_date(date, DatePattern::DayLongMonth)),
            }
        };
        let income = card(totals.income, Some(TransactionType::Positive));
        let outcome = card(totals.outcome, Some(TransactionType::Negative));
        let balance = card(totals.balance, None);

        let rows = records
            .iter()
            .map(|record| TransactionRow {
                id: record.id,
                name: record.name.clone(),
                kind: record.kind,
                amount_formatted: formatter.format_amount(record.amount),
                category: record.category.clone(),
                category_name: catalog.get(&record.category).map(|c| c.name.clone()),
                date_formatted: formatter.format_date(record.date, DatePattern::NumericShort),
            })
            .collect();

        DashboardSummary {
            totals,
            income,
            outcome,
            balance,
            rows,
        }
    }

    /// Category breakdown for `window` with formatted totals and percent labels.
    pub fn resume<F>(
        records: &[TransactionRecord],
        window: &AggregationWindow,
        catalog: &CategoryCatalog,
        formatter: &F,
    ) -> ResumeSummary
    where
        F: CurrencyFormatter,
    {
        let entries = aggregator::category_breakdown(records, window, catalog)
            .into_iter()
            .map(|breakdown| ResumeEntry {
                total_formatted: formatter.format_amount(breakdown.total),
                percent_label: format!("{}%", breakdown.percent),
                breakdown,
            })
            .collect();
        ResumeSummary {
            year: window.year(),
            month: window.month(),
            entries,
        }
    }
}
