//! Ledger-level document and aggregation window types.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::transaction::TransactionRecord;

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope persisted under a ledger storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerDocument {
    pub schema_version: u32,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

impl LedgerDocument {
    pub fn new(transactions: Vec<TransactionRecord>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions,
        }
    }
}

impl Default for LedgerDocument {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Calendar month used to scope category breakdowns.
///
/// Membership is evaluated in `offset`, so a record made late on the last day
/// of a month in local time stays in that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationWindow {
    year: i32,
    month: u32,
    offset: FixedOffset,
}

impl AggregationWindow {
    pub fn new(year: i32, month: u32) -> Result<Self, AggregationWindowError> {
        if !(1..=12).contains(&month) {
            return Err(AggregationWindowError::InvalidMonth(month));
        }
        Ok(Self {
            year,
            month,
            offset: utc_offset(),
        })
    }

    /// Window containing `timestamp` as seen from `offset`.
    pub fn containing(timestamp: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = timestamp.with_timezone(&offset);
        Self {
            year: local.year(),
            month: local.month(),
            offset,
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let local = timestamp.with_timezone(&self.offset);
        local.year() == self.year && local.month() == self.month
    }

    pub fn next(&self) -> Self {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        Self { year, month, ..*self }
    }

    pub fn previous(&self) -> Self {
        let (year, month) = if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        };
        Self { year, month, ..*self }
    }
}

impl fmt::Display for AggregationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`AggregationWindow`] values.
pub enum AggregationWindowError {
    InvalidMonth(u32),
}

impl fmt::Display for AggregationWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationWindowError::InvalidMonth(month) => {
                write!(f, "month must be between 1 and 12, got {month}")
            }
        }
    }
}

impl std::error::Error for AggregationWindowError {}
