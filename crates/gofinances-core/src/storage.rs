//! Ledger Store contract and the ledger (de)serialization that runs over it.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use gofinances_domain::{
    Identifiable, LedgerDocument, TransactionRecord, CURRENT_SCHEMA_VERSION,
};

use crate::{validation::check_stored_record, CoreError};

/// Asynchronous string key-value persistence supplied by the platform.
///
/// Implementations make no atomicity promise across a read-modify-write cycle.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored blob, or `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), CoreError>;
    /// Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), CoreError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        (**self).remove(key).await
    }
}

/// Process-local store, used by tests and as a scratch backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Storage key layout under an application namespace such as `@gofinances`.
pub struct StorageKey;

impl StorageKey {
    pub fn user(namespace: &str) -> String {
        format!("{namespace}:user")
    }

    /// Per-user ledger key, or the legacy global key when `user_id` is `None`.
    pub fn transactions(namespace: &str, user_id: Option<&str>) -> String {
        match user_id {
            Some(id) => format!("{namespace}:transactions_ser:{id}"),
            None => format!("{namespace}:transactions"),
        }
    }
}

/// Outcome of decoding a stored ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub records: Vec<TransactionRecord>,
    /// Version found in storage before migration; `None` when the key was absent.
    pub schema_version: Option<u32>,
    pub migrations: Vec<String>,
}

/// Decodes a stored blob, migrating legacy shapes and checking every record.
pub fn decode_ledger(blob: &str) -> Result<LoadReport, CoreError> {
    let value: Value = serde_json::from_str(blob)
        .map_err(|err| CoreError::Schema(format!("ledger is not valid JSON: {err}")))?;

    let mut migrations = Vec::new();
    let (schema_version, raw_records) = match value {
        Value::Array(items) => {
            migrations.push(format!(
                "schema v0 -> v{CURRENT_SCHEMA_VERSION}: wrapped bare transaction array"
            ));
            (0, items)
        }
        Value::Object(mut map) => {
            let found = map
                .get("schema_version")
                .and_then(Value::as_u64)
                .ok_or_else(|| CoreError::Schema("ledger is missing `schema_version`".into()))?;
            if found > u64::from(CURRENT_SCHEMA_VERSION) {
                return Err(CoreError::UnsupportedSchema {
                    found,
                    supported: CURRENT_SCHEMA_VERSION,
                });
            }
            let items = match map.remove("transactions") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(CoreError::Schema(format!(
                        "`transactions` must be an array, found {}",
                        json_kind(&other)
                    )))
                }
            };
            (found as u32, items)
        }
        Value::Null => (CURRENT_SCHEMA_VERSION, Vec::new()),
        other => {
            return Err(CoreError::Schema(format!(
                "unexpected ledger shape: {}",
                json_kind(&other)
            )))
        }
    };

    let records = raw_records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let record: TransactionRecord = serde_json::from_value(raw)
                .map_err(|err| CoreError::Schema(format!("record #{index}: {err}")))?;
            check_stored_record(&record)
                .map_err(|reason| CoreError::Schema(format!("record #{index}: {reason}")))?;
            Ok(record)
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(LoadReport {
        records,
        schema_version: Some(schema_version),
        migrations,
    })
}

/// Encodes records into the current versioned document.
pub fn encode_ledger(records: &[TransactionRecord]) -> Result<String, CoreError> {
    let document = LedgerDocument::new(records.to_vec());
    Ok(serde_json::to_string(&document)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads and writes one identity's ledger through a [`KeyValueStore`].
pub struct LedgerRepository<'a> {
    store: &'a dyn KeyValueStore,
    key: String,
}

impl<'a> LedgerRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the ledger. An absent key is an empty ledger, not an error.
    pub async fn load(&self) -> Result<LoadReport, CoreError> {
        let Some(blob) = self.store.get(&self.key).await? else {
            tracing::debug!(key = %self.key, "ledger key absent, starting empty");
            return Ok(LoadReport::default());
        };
        let report = decode_ledger(&blob)?;
        for migration in &report.migrations {
            tracing::info!(key = %self.key, %migration, "ledger migrated on read");
        }
        Ok(report)
    }

    pub async fn records(&self) -> Result<Vec<TransactionRecord>, CoreError> {
        Ok(self.load().await?.records)
    }

    /// Appends one record and rewrites the whole sequence. Returns the new length.
    ///
    /// Two overlapping appends against the same key can lose one of the writes.
    pub async fn append(&self, record: TransactionRecord) -> Result<usize, CoreError> {
        let mut records = self.records().await?;
        let id = record.id();
        records.push(record);
        self.save_all(&records).await?;
        tracing::info!(key = %self.key, %id, count = records.len(), "transaction appended");
        Ok(records.len())
    }

    pub async fn save_all(&self, records: &[TransactionRecord]) -> Result<(), CoreError> {
        let blob = encode_ledger(records)?;
        self.store.set(&self.key, blob).await
    }

    /// Moves the ledger stored under `legacy_key` into this key when this key
    /// is still absent. Returns how many records were moved.
    pub async fn adopt(&self, legacy_key: &str) -> Result<usize, CoreError> {
        if legacy_key == self.key || self.store.get(&self.key).await?.is_some() {
            return Ok(0);
        }
        let Some(blob) = self.store.get(legacy_key).await? else {
            return Ok(0);
        };
        let report = decode_ledger(&blob)?;
        self.save_all(&report.records).await?;
        self.store.remove(legacy_key).await?;
        tracing::info!(
            from = legacy_key,
            to = %self.key,
            count = report.records.len(),
            "legacy ledger adopted"
        );
        Ok(report.records.len())
    }

    /// Deletes the entire ledger.
    pub async fn clear(&self) -> Result<(), CoreError> {
        self.store.remove(&self.key).await?;
        tracing::info!(key = %self.key, "ledger cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gofinances_domain::TransactionType;
    use rust_decimal::Decimal;

    fn sample(amount: i64, kind: TransactionType, category: &str) -> TransactionRecord {
        TransactionRecord::new(
            "sample",
            Decimal::from(amount),
            kind,
            category,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn key_layout_matches_namespace_conventions() {
        assert_eq!(StorageKey::user("@gofinances"), "@gofinances:user");
        assert_eq!(
            StorageKey::transactions("@gofinances", None),
            "@gofinances:transactions"
        );
        assert_eq!(
            StorageKey::transactions("@gofinances", Some("42")),
            "@gofinances:transactions_ser:42"
        );
    }

    #[test]
    fn legacy_bare_array_is_migrated() {
        let blob = r#"[{
            "id": "2f1f0f5e-8d9a-4c43-9f11-3b0a0c7f5e10",
            "name": "Salary",
            "amount": "3000",
            "type": "positive",
            "category": "salary",
            "date": "2021-06-01T12:00:00.000Z"
        }]"#;
        let report = decode_ledger(blob).expect("decode legacy");
        assert_eq!(report.schema_version, Some(0));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.migrations.len(), 1);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let err = decode_ledger(r#"{"schema_version": 9, "transactions": []}"#).unwrap_err();
        match err {
            CoreError::UnsupportedSchema { found, supported } => {
                assert_eq!(found, 9);
                assert_eq!(supported, CURRENT_SCHEMA_VERSION);
            }
            other => panic!("expected unsupported schema, got {other:?}"),
        }
    }

    #[test]
    fn malformed_records_are_detected() {
        let zero_amount = r#"[{
            "id": "2f1f0f5e-8d9a-4c43-9f11-3b0a0c7f5e10",
            "name": "Zero",
            "amount": "0",
            "type": "negative",
            "category": "food",
            "date": "2021-06-01T12:00:00.000Z"
        }]"#;
        assert!(matches!(decode_ledger(zero_amount), Err(CoreError::Schema(_))));
        let oversized = zero_amount.replace(r#""0""#, r#""79228162514264337593543950335""#);
        assert!(matches!(decode_ledger(&oversized), Err(CoreError::Schema(_))));
        assert!(matches!(decode_ledger("42"), Err(CoreError::Schema(_))));
        assert!(matches!(decode_ledger("not json"), Err(CoreError::Schema(_))));
        assert!(matches!(
            decode_ledger(r#"{"transactions": []}"#),
            Err(CoreError::Schema(_))
        ));
    }

    #[test]
    fn encoded_ledger_round_trips() {
        let records = vec![
            sample(100, TransactionType::Positive, "salary"),
            sample(40, TransactionType::Negative, "food"),
        ];
        let blob = encode_ledger(&records).unwrap();
        let report = decode_ledger(&blob).unwrap();
        assert_eq!(report.records, records);
        assert_eq!(report.schema_version, Some(CURRENT_SCHEMA_VERSION));
        assert!(report.migrations.is_empty());
    }

    #[tokio::test]
    async fn repository_appends_in_order_and_clears() {
        let store = MemoryStore::new();
        let repo = LedgerRepository::new(&store, StorageKey::transactions("@test", Some("u1")));

        assert!(repo.records().await.unwrap().is_empty());

        let first = sample(10, TransactionType::Negative, "food");
        let second = sample(20, TransactionType::Positive, "salary");
        assert_eq!(repo.append(first.clone()).await.unwrap(), 1);
        assert_eq!(repo.append(second.clone()).await.unwrap(), 2);
        assert_eq!(repo.records().await.unwrap(), vec![first, second]);

        repo.clear().await.unwrap();
        assert!(repo.records().await.unwrap().is_empty());
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn legacy_global_ledger_is_adopted_once() {
        let store = MemoryStore::new();
        let legacy_key = StorageKey::transactions("@test", None);
        let legacy = vec![sample(15, TransactionType::Negative, "food")];
        store
            .set(&legacy_key, serde_json::to_string(&legacy).unwrap())
            .await
            .unwrap();

        let repo = LedgerRepository::new(&store, StorageKey::transactions("@test", Some("u1")));
        assert_eq!(repo.adopt(&legacy_key).await.unwrap(), 1);
        assert_eq!(repo.records().await.unwrap(), legacy);
        assert_eq!(store.get(&legacy_key).await.unwrap(), None);
        assert_eq!(repo.adopt(&legacy_key).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn adopt_leaves_existing_user_ledger_alone() {
        let store = MemoryStore::new();
        let legacy_key = StorageKey::transactions("@test", None);
        store.set(&legacy_key, "[]".to_string()).await.unwrap();

        let repo = LedgerRepository::new(&store, StorageKey::transactions("@test", Some("u1")));
        let own = sample(30, TransactionType::Positive, "salary");
        repo.append(own.clone()).await.unwrap();

        assert_eq!(repo.adopt(&legacy_key).await.unwrap(), 0);
        assert_eq!(repo.records().await.unwrap(), vec![own]);
        assert!(store.get(&legacy_key).await.unwrap().is_some());
    }
}
