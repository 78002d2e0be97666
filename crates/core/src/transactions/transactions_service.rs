use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::Mutex;

use super::LedgerServiceTrait;
use crate::constants::store_keys;
use crate::errors::{DatabaseError, Result, ValidationError};
use crate::store::{load_json, save_json, KeyValueStoreTrait};
use crate::transactions::{NewTransaction, Transaction};

/// Ledger persisted as one JSON array under the transactions key.
pub struct LedgerService {
    store: Arc<dyn KeyValueStoreTrait>,
    // Serializes read-modify-write cycles on the ledger key.
    write_lock: Mutex<()>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn KeyValueStoreTrait>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<Transaction>> {
        Ok(load_json(self.store.as_ref(), store_keys::TRANSACTIONS)?.unwrap_or_default())
    }

    async fn save(&self, transactions: &[Transaction]) -> Result<()> {
        save_json(self.store.as_ref(), store_keys::TRANSACTIONS, transactions).await
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.load()
    }

    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let transaction = new_transaction.validate()?;
        let mut added = self.append_transactions(vec![transaction]).await?;
        Ok(added.remove(0))
    }

    async fn append_transactions(&self, transactions: Vec<Transaction>) -> Result<Vec<Transaction>> {
        let _guard = self.write_lock.lock().await;
        let mut ledger = self.load()?;

        for tx in &transactions {
            if ledger.iter().any(|existing| existing.id == tx.id) {
                return Err(ValidationError::InvalidInput(format!(
                    "Transaction id '{}' already exists",
                    tx.id
                ))
                .into());
            }
        }

        ledger.extend(transactions.iter().cloned());
        self.save(&ledger).await?;
        info!(
            "Appended {} transaction(s); ledger now holds {}",
            transactions.len(),
            ledger.len()
        );
        Ok(transactions)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let _guard = self.write_lock.lock().await;
        let mut ledger = self.load()?;

        let position = ledger
            .iter()
            .position(|tx| tx.id == transaction_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Transaction {}", transaction_id)))?;
        let removed = ledger.remove(position);

        self.save(&ledger).await?;
        debug!("Deleted transaction {}", transaction_id);
        Ok(removed)
    }
}
