pub mod json_backend;
pub mod memory;

use std::collections::HashSet;

use crate::{domain::Transaction, errors::StorageError};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Durable home of the transaction collection. Every save overwrites the whole
/// collection; there are no partial or delta writes.
pub trait TransactionStorage: Send + Sync {
    /// Returns the stored collection, `None` when nothing has been stored yet,
    /// or [`StorageError::Corrupt`] when the snapshot cannot be parsed.
    fn load(&self) -> Result<Option<Vec<Transaction>>>;

    fn save(&self, transactions: &[Transaction]) -> Result<()>;

    /// Sets an unreadable snapshot aside before it gets replaced.
    fn quarantine(&self) -> Result<()> {
        Ok(())
    }
}

/// Rejects snapshots that break store invariants even though they parsed.
pub fn check_snapshot(transactions: &[Transaction]) -> Result<()> {
    let mut seen = HashSet::with_capacity(transactions.len());
    for txn in transactions {
        if !seen.insert(txn.id) {
            return Err(StorageError::Corrupt(format!(
                "transaction id {} appears more than once",
                txn.id
            )));
        }
    }
    Ok(())
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
