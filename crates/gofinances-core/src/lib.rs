//! gofinances-core
//!
//! Aggregation, formatting, validation and the ledger store contract.
//! Depends on gofinances-domain. No UI, no platform storage implementation.

pub mod aggregator;
pub mod error;
pub mod format;
pub mod session;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod validation;

pub use aggregator::{category_breakdown, last_transaction_date, totals_by_type};
pub use aggregator::{CategoryBreakdownEntry, Totals};
pub use error::CoreError;
pub use format::{
    format_currency, format_date, CurrencyCode, CurrencyFormatter, DateFormatter, DatePattern,
    FormatError, LocaleConfig, LocaleFormatter,
};
pub use session::{IdentityOutcome, IdentityProvider, Session};
pub use storage::{KeyValueStore, LedgerRepository, LoadReport, MemoryStore, StorageKey};
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use validation::{TransactionDraft, ValidationError, ValidationErrors, MAX_AMOUNT};
