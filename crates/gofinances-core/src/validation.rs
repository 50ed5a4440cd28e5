//! Record-creation form rules. Failing drafts never reach the store.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use gofinances_domain::{CategoryCatalog, TransactionRecord, TransactionType};

use crate::time::Clock;

/// Raw user input for a new transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionDraft {
    pub name: String,
    pub amount: String,
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
}

impl TransactionDraft {
    pub fn new(
        name: impl Into<String>,
        amount: impl Into<String>,
        kind: TransactionType,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            kind: Some(kind),
            category: Some(category.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,
    #[error("amount is required")]
    AmountRequired,
    #[error("amount must be a number")]
    AmountNotNumeric,
    #[error("amount must be positive")]
    AmountNotPositive,
    #[error("amount is too large")]
    AmountTooLarge,
    #[error("transaction type must be selected")]
    TypeRequired,
    #[error("category must be selected")]
    CategoryRequired,
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
}

/// Every rule a draft violated, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", join_issues(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn issues(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn contains(&self, issue: &ValidationError) -> bool {
        self.0.contains(issue)
    }
}

fn join_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Largest accepted amount (one trillion). Keeps ledger sums far from `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Parses a user-typed amount. Accepts `12.50` and, when no dot is present, a
/// single decimal comma (`12,50`).
pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::AmountRequired);
    }
    let normalized = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    let amount = Decimal::from_str(&normalized).map_err(|_| ValidationError::AmountNotNumeric)?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::AmountNotPositive);
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge);
    }
    Ok(amount)
}

/// Checks `draft` and turns it into a new record dated `clock.now()`.
pub fn build_record(
    draft: &TransactionDraft,
    catalog: &CategoryCatalog,
    clock: &dyn Clock,
) -> Result<TransactionRecord, ValidationErrors> {
    let mut issues = Vec::new();

    let name = draft.name.trim();
    if name.is_empty() {
        issues.push(ValidationError::NameRequired);
    }

    let amount = match parse_amount(&draft.amount) {
        Ok(amount) => Some(amount),
        Err(issue) => {
            issues.push(issue);
            None
        }
    };

    if draft.kind.is_none() {
        issues.push(ValidationError::TypeRequired);
    }

    match draft.category.as_deref().map(str::trim) {
        None | Some("") => issues.push(ValidationError::CategoryRequired),
        Some(key) if !catalog.contains(key) => {
            issues.push(ValidationError::UnknownCategory(key.to_string()))
        }
        Some(_) => {}
    }

    match (amount, draft.kind, draft.category.as_deref()) {
        (Some(amount), Some(kind), Some(category)) if issues.is_empty() => Ok(
            TransactionRecord::new(name, amount, kind, category.trim(), clock.now()),
        ),
        _ => Err(ValidationErrors(issues)),
    }
}

/// Read-side invariant check for records loaded from storage.
pub fn check_stored_record(record: &TransactionRecord) -> Result<(), String> {
    if record.name.trim().is_empty() {
        return Err(format!("record {} has an empty name", record.id));
    }
    if record.amount <= Decimal::ZERO {
        return Err(format!(
            "record {} has non-positive amount {}",
            record.id, record.amount
        ));
    }
    if record.amount > MAX_AMOUNT {
        return Err(format!(
            "record {} has amount {} above {MAX_AMOUNT}",
            record.id, record.amount
        ));
    }
    Ok(())
}
