//! Ledger domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::CASH_INSTRUMENT_CODE;
use crate::errors::{Error, Result, ValidationError};

/// Top-level asset class used for rebalancing targets.
///
/// Declaration order is the tie-break order used by gap allocation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    #[serde(alias = "stock")]
    Equity,
    Gold,
    Bond,
    Cash,
}

impl Category {
    /// All categories, in tie-break order.
    pub const ALL: [Category; 4] = [
        Category::Equity,
        Category::Gold,
        Category::Bond,
        Category::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Equity => "equity",
            Category::Gold => "gold",
            Category::Bond => "bond",
            Category::Cash => "cash",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equity" | "stock" => Ok(Category::Equity),
            "gold" => Ok(Category::Gold),
            "bond" => Ok(Category::Bond),
            "cash" => Ok(Category::Cash),
            other => Err(ValidationError::InvalidInput(format!("Unknown category '{}'", other)).into()),
        }
    }
}

/// Transaction kind without its payload.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    Buy,
    Sell,
    #[serde(alias = "reinvest")]
    DividendReinvest,
}

/// What a transaction does to the position. Units are always positive;
/// the variant carries the sign.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransactionAction {
    Buy { units: Decimal },
    Sell { units: Decimal },
    #[serde(rename = "dividendReinvest", alias = "reinvest")]
    Reinvest { units: Decimal },
}

impl TransactionAction {
    pub fn new(kind: TransactionKind, units: Decimal) -> Self {
        match kind {
            TransactionKind::Buy => TransactionAction::Buy { units },
            TransactionKind::Sell => TransactionAction::Sell { units },
            TransactionKind::DividendReinvest => TransactionAction::Reinvest { units },
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionAction::Buy { .. } => TransactionKind::Buy,
            TransactionAction::Sell { .. } => TransactionKind::Sell,
            TransactionAction::Reinvest { .. } => TransactionKind::DividendReinvest,
        }
    }

    pub fn units(&self) -> Decimal {
        match self {
            TransactionAction::Buy { units }
            | TransactionAction::Sell { units }
            | TransactionAction::Reinvest { units } => *units,
        }
    }

    /// Units as a position delta: negative for sells.
    pub fn signed_units(&self) -> Decimal {
        match self {
            TransactionAction::Sell { units } => -*units,
            other => other.units(),
        }
    }

    /// Buys and reinvestments add units and carry cost.
    pub fn is_acquisition(&self) -> bool {
        !matches!(self, TransactionAction::Sell { .. })
    }
}

/// A ledger entry. Never mutated once recorded; only deleted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub instrument_code: String,
    pub display_name: String,
    pub category: Category,
    pub action: TransactionAction,
    /// Authoritative settled cash amount; overrides price-derived valuation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_cash_amount: Option<Decimal>,
    pub settlement_date: NaiveDate,
    /// `baseline price × units − cash amount` for entries confirmed from a strategy session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing_alpha: Option<Decimal>,
}

impl Transaction {
    pub fn units(&self) -> Decimal {
        self.action.units()
    }

    pub fn kind(&self) -> TransactionKind {
        self.action.kind()
    }
}

/// Input model for recording a transaction.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default)]
    pub id: Option<String>,
    pub instrument_code: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub category: Category,
    pub kind: TransactionKind,
    pub units: Decimal,
    #[serde(default)]
    pub recorded_cash_amount: Option<Decimal>,
    pub settlement_date: NaiveDate,
    #[serde(default)]
    pub timing_alpha: Option<Decimal>,
}

impl NewTransaction {
    /// Validates the input and builds the ledger entry.
    ///
    /// Cash entries without a code are booked against the cash pseudo
    /// instrument. A missing id gets a fresh UUID v4.
    pub fn validate(self) -> Result<Transaction> {
        let mut code = self.instrument_code.trim().to_string();
        if code.is_empty() && self.category == Category::Cash {
            code = CASH_INSTRUMENT_CODE.to_string();
        }
        if code.is_empty() {
            return Err(ValidationError::MissingField("instrumentCode".to_string()).into());
        }

        if self.units <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Units must be positive, got {}",
                self.units
            ))
            .into());
        }

        if let Some(amount) = self.recorded_cash_amount {
            if amount < Decimal::ZERO {
                return Err(ValidationError::InvalidInput(format!(
                    "Cash amount cannot be negative, got {}",
                    amount
                ))
                .into());
            }
        }

        let id = self
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let display_name = self
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| code.clone());

        Ok(Transaction {
            id,
            instrument_code: code,
            display_name,
            category: self.category,
            action: TransactionAction::new(self.kind, self.units),
            recorded_cash_amount: self.recorded_cash_amount,
            settlement_date: self.settlement_date,
            timing_alpha: self.timing_alpha,
        })
    }
}

/// Distinct instrument codes in the ledger, first-seen order.
pub fn instrument_codes(transactions: &[Transaction]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for tx in transactions {
        if !codes.iter().any(|c| c == &tx.instrument_code) {
            codes.push(tx.instrument_code.clone());
        }
    }
    codes
}
