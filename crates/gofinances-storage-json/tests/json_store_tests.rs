use chrono::{TimeZone, Utc};
use gofinances_core::{KeyValueStore, LedgerRepository, StorageKey};
use gofinances_domain::{TransactionRecord, TransactionType};
use gofinances_storage_json::JsonFileStore;
use rust_decimal::Decimal;
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn json_store_sets_gets_and_removes() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path().join("store"))
        .await
        .expect("open store");

    assert_eq!(store.get("@gofinances:user").await.unwrap(), None);

    store
        .set("@gofinances:user", r#"{"id":"1"}"#.to_string())
        .await
        .expect("set");
    assert_eq!(
        store.get("@gofinances:user").await.unwrap().as_deref(),
        Some(r#"{"id":"1"}"#)
    );
    let path = store.key_path("@gofinances:user");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());

    store.remove("@gofinances:user").await.expect("remove");
    assert_eq!(store.get("@gofinances:user").await.unwrap(), None);
    store
        .remove("@gofinances:user")
        .await
        .expect("removing an absent key succeeds");
}

#[tokio::test]
async fn ledger_survives_reopening_the_store() {
    let dir = tempdir().expect("tempdir");
    let key = StorageKey::transactions("@gofinances", Some("42"));
    let record = TransactionRecord::new(
        "Rent",
        Decimal::new(120_050, 2),
        TransactionType::Negative,
        "purchases",
        Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap(),
    );

    {
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        let repo = LedgerRepository::new(&store, key.clone());
        repo.append(record.clone()).await.unwrap();
    }

    let reopened = JsonFileStore::open(dir.path()).await.unwrap();
    let repo = LedgerRepository::new(&reopened, key);
    assert_eq!(repo.records().await.unwrap(), vec![record]);
}

#[tokio::test]
async fn failed_write_preserves_previous_document() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path()).await.unwrap();
    store.set("ledger", "[]".to_string()).await.unwrap();

    // A directory where the temp file should go makes File::create fail.
    let mut blocker = store.key_path("ledger");
    blocker.set_extension("json.tmp");
    fs::create_dir_all(&blocker).unwrap();

    assert!(store.set("ledger", "[1]".to_string()).await.is_err());
    assert_eq!(store.get("ledger").await.unwrap().as_deref(), Some("[]"));
}
