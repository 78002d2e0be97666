use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::constants::store_keys;
use crate::errors::{DatabaseError, Error, PersistenceError};
use crate::store::{InMemoryStore, KeyValueStoreTrait};
use crate::transactions::{
    Category, LedgerService, LedgerServiceTrait, NewTransaction, TransactionKind,
};

fn input(code: &str, kind: TransactionKind) -> NewTransaction {
    NewTransaction {
        id: None,
        instrument_code: code.to_string(),
        display_name: None,
        category: Category::Bond,
        kind,
        units: dec!(10),
        recorded_cash_amount: Some(dec!(10.2)),
        settlement_date: NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
        timing_alpha: None,
    }
}

#[tokio::test]
async fn test_add_list_delete() {
    let store = Arc::new(InMemoryStore::new());
    let service = LedgerService::new(store.clone());

    let first = service
        .add_transaction(input("000123", TransactionKind::Buy))
        .await
        .unwrap();
    let second = service
        .add_transaction(input("000123", TransactionKind::Sell))
        .await
        .unwrap();

    let listed = service.list_transactions().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert!(store.get(store_keys::TRANSACTIONS).unwrap().is_some());

    let removed = service.delete_transaction(&first.id).await.unwrap();
    assert_eq!(removed.id, first.id);
    let listed = service.list_transactions().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, second.id);
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let service = LedgerService::new(Arc::new(InMemoryStore::new()));
    let err = service.delete_transaction("nope").await.unwrap_err();
    assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
}

#[tokio::test]
async fn test_duplicate_id_rejected() {
    let service = LedgerService::new(Arc::new(InMemoryStore::new()));
    let mut tx = input("000123", TransactionKind::Buy);
    tx.id = Some("fixed".to_string());
    service.add_transaction(tx.clone()).await.unwrap();
    assert!(service.add_transaction(tx).await.is_err());
    assert_eq!(service.list_transactions().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_ledger_surfaces_and_is_not_overwritten() {
    let store = Arc::new(InMemoryStore::with_entries([(
        store_keys::TRANSACTIONS,
        r#"{"oops": true}"#,
    )]));
    let service = LedgerService::new(store.clone());

    assert!(matches!(
        service.list_transactions(),
        Err(Error::Persistence(PersistenceError::Malformed { .. }))
    ));
    assert!(service
        .add_transaction(input("000123", TransactionKind::Buy))
        .await
        .is_err());
    assert_eq!(
        store.get(store_keys::TRANSACTIONS).unwrap().as_deref(),
        Some(r#"{"oops": true}"#)
    );
}
