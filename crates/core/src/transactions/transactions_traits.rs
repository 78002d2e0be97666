use async_trait::async_trait;

use crate::errors::Result;
use crate::transactions::{NewTransaction, Transaction};

/// Service trait for the transaction ledger.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// All transactions in insertion order.
    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// Validates and appends one transaction.
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    /// Appends already-built transactions in a single write.
    async fn append_transactions(&self, transactions: Vec<Transaction>) -> Result<Vec<Transaction>>;

    /// Removes a transaction by id and returns it.
    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction>;
}
