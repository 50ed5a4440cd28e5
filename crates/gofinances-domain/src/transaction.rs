//! Domain models for ledger transaction records.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A single income or expense entry. Immutable once appended to a ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub name: String,
    /// Magnitude only; direction is carried by `kind`.
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    /// Kept at millisecond precision, matching the stored form.
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(
        name: impl Into<String>,
        amount: Decimal,
        kind: TransactionType,
        category: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            kind,
            category: category.into(),
            date: date.trunc_subsecs(3),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Positive
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Negative
    }
}

impl Identifiable for TransactionRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for TransactionRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Income.
    Positive,
    /// Expense.
    Negative,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Positive => "positive",
            TransactionType::Negative => "negative",
        };
        f.write_str(label)
    }
}

/// Serde adapter for record timestamps.
///
/// Writes RFC 3339 with millisecond precision. Reads either an RFC 3339 string
/// or a number of milliseconds since the Unix epoch.
pub mod timestamp {
    use std::fmt;

    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::{
        de::{self, Visitor},
        Deserializer, Serializer,
    };

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimestampVisitor)
    }

    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an RFC 3339 timestamp or epoch milliseconds")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            DateTime::parse_from_rfc3339(value.trim())
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|err| E::custom(format!("invalid timestamp `{value}`: {err}")))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Utc.timestamp_millis_opt(value)
                .single()
                .ok_or_else(|| E::custom(format!("timestamp {value} is out of range")))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let millis = i64::try_from(value)
                .map_err(|_| E::custom(format!("timestamp {value} is out of range")))?;
            self.visit_i64(millis)
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !value.is_finite() || value.fract() != 0.0 {
                return Err(E::custom(format!("timestamp {value} is not whole milliseconds")));
            }
            if value < i64::MIN as f64 || value > i64::MAX as f64 {
                return Err(E::custom(format!("timestamp {value} is out of range")));
            }
            self.visit_i64(value as i64)
        }
    }
}
