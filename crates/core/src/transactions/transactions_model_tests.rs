use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::CASH_INSTRUMENT_CODE;
use crate::errors::{Error, ValidationError};
use crate::transactions::{
    instrument_codes, Category, NewTransaction, Transaction, TransactionAction, TransactionKind,
};

fn new_buy(code: &str, units: Decimal) -> NewTransaction {
    NewTransaction {
        id: None,
        instrument_code: code.to_string(),
        display_name: Some("Demo Equity Fund".to_string()),
        category: Category::Equity,
        kind: TransactionKind::Buy,
        units,
        recorded_cash_amount: None,
        settlement_date: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
        timing_alpha: None,
    }
}

#[test]
fn test_validate_builds_tagged_action() {
    let tx = new_buy(" 110022 ", dec!(12.5)).validate().unwrap();
    assert_eq!(tx.instrument_code, "110022");
    assert_eq!(tx.action, TransactionAction::Buy { units: dec!(12.5) });
    assert!(!tx.id.is_empty());
}

#[test]
fn test_validate_rejects_non_positive_units() {
    for units in [Decimal::ZERO, dec!(-3)] {
        let err = new_buy("110022", units).validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidInput(_))
        ));
    }
}

#[test]
fn test_validate_rejects_negative_cash_amount() {
    let mut input = new_buy("110022", dec!(1));
    input.recorded_cash_amount = Some(dec!(-0.01));
    assert!(input.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_code() {
    let err = new_buy("  ", dec!(1)).validate().unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::MissingField(field)) if field == "instrumentCode"
    ));
}

#[test]
fn test_cash_entry_defaults_to_cash_instrument() {
    let mut input = new_buy("", dec!(100));
    input.category = Category::Cash;
    input.display_name = None;
    let tx = input.validate().unwrap();
    assert_eq!(tx.instrument_code, CASH_INSTRUMENT_CODE);
    assert_eq!(tx.display_name, CASH_INSTRUMENT_CODE);
}

#[test]
fn test_signed_units() {
    assert_eq!(TransactionAction::Sell { units: dec!(4) }.signed_units(), dec!(-4));
    assert_eq!(TransactionAction::Reinvest { units: dec!(4) }.signed_units(), dec!(4));
    assert!(TransactionAction::Reinvest { units: dec!(1) }.is_acquisition());
}

#[test]
fn test_transaction_json_shape() {
    let tx = Transaction {
        id: "t1".to_string(),
        instrument_code: "000216".to_string(),
        display_name: "Gold ETF Link".to_string(),
        category: Category::Gold,
        action: TransactionAction::Reinvest { units: dec!(2.5) },
        recorded_cash_amount: Some(dec!(5)),
        settlement_date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
        timing_alpha: None,
    };

    let value = serde_json::to_value(&tx).unwrap();
    assert_eq!(value["action"]["kind"], "dividendReinvest");
    assert_eq!(value["action"]["units"], 2.5);
    assert_eq!(value["category"], "gold");
    assert_eq!(value["settlementDate"], "2024-06-28");
    assert!(value.get("timingAlpha").is_none());

    let parsed: Transaction = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, tx);
}

#[test]
fn test_legacy_category_and_kind_aliases() {
    let json = r#"{"id":"a","instrumentCode":"110022","displayName":"x","category":"stock",
        "action":{"kind":"reinvest","units":1.0},"settlementDate":"2024-01-02"}"#;
    let tx: Transaction = serde_json::from_str(json).unwrap();
    assert_eq!(tx.category, Category::Equity);
    assert_eq!(tx.kind(), TransactionKind::DividendReinvest);
}

#[test]
fn test_category_from_str() {
    assert_eq!("Stock".parse::<Category>().unwrap(), Category::Equity);
    assert_eq!("cash".parse::<Category>().unwrap(), Category::Cash);
    assert!("crypto".parse::<Category>().is_err());
}

#[test]
fn test_instrument_codes_first_seen_order() {
    let a = new_buy("A", dec!(1)).validate().unwrap();
    let b = new_buy("B", dec!(1)).validate().unwrap();
    let a2 = new_buy("A", dec!(2)).validate().unwrap();
    assert_eq!(instrument_codes(&[a, b, a2]), vec!["A", "B"]);
}
