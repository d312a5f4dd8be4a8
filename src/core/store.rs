//! Owned, persisted collection of transactions.

use std::fmt;

use uuid::Uuid;

use crate::domain::{seed_transactions, Transaction};
use crate::errors::{StorageError, StoreError, StoreResult};
use crate::storage::{check_snapshot, TransactionStorage};

/// Where the store's initial contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// A readable snapshot was found in storage.
    Loaded,
    /// Storage held nothing, so the seed dataset was installed.
    SeededEmpty,
    /// The stored snapshot could not be used and was replaced by the seed dataset.
    SeededCorrupt,
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SnapshotSource::Loaded => "loaded",
            SnapshotSource::SeededEmpty => "seeded (empty storage)",
            SnapshotSource::SeededCorrupt => "seeded (unreadable snapshot replaced)",
        };
        f.write_str(label)
    }
}

/// Outcome of [`TransactionStore::bootstrap`].
#[derive(Debug)]
pub struct BootstrapReport {
    pub source: SnapshotSource,
    pub count: usize,
    /// Set when writing the freshly seeded collection failed.
    pub persist_error: Option<StorageError>,
}

/// In-memory transaction collection in insertion order, mirrored to storage.
///
/// Memory is always ahead of or equal to durable state: every mutation lands in
/// memory first and is then written out as a full snapshot (or deferred until
/// [`flush`](TransactionStore::flush) when autosave is off).
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    storage: Box<dyn TransactionStorage>,
    autosave: bool,
    dirty: bool,
}

impl TransactionStore {
    /// Loads the stored snapshot, or installs and persists the seed dataset when
    /// storage is empty or unreadable. Never fails.
    pub fn bootstrap(storage: Box<dyn TransactionStorage>) -> (Self, BootstrapReport) {
        Self::bootstrap_with_seed(storage, seed_transactions)
    }

    pub fn bootstrap_with_seed<F>(
        storage: Box<dyn TransactionStorage>,
        seed: F,
    ) -> (Self, BootstrapReport)
    where
        F: FnOnce() -> Vec<Transaction>,
    {
        let loaded = storage.load().and_then(|snapshot| {
            if let Some(transactions) = snapshot.as_deref() {
                check_snapshot(transactions)?;
            }
            Ok(snapshot)
        });

        let (transactions, source) = match loaded {
            Ok(Some(transactions)) => (transactions, SnapshotSource::Loaded),
            Ok(None) => (seed(), SnapshotSource::SeededEmpty),
            Err(err) => {
                tracing::warn!(error = %err, "stored transactions unreadable; reseeding");
                if let Err(err) = storage.quarantine() {
                    tracing::warn!(error = %err, "could not keep a copy of the unreadable snapshot");
                }
                (seed(), SnapshotSource::SeededCorrupt)
            }
        };

        let mut store = Self {
            transactions,
            storage,
            autosave: true,
            dirty: false,
        };

        let persist_error = match source {
            SnapshotSource::Loaded => None,
            _ => store.storage.save(&store.transactions).err(),
        };
        if let Some(err) = persist_error.as_ref() {
            tracing::warn!(error = %err, "failed to persist seed transactions");
            store.dirty = true;
        }

        tracing::info!(count = store.transactions.len(), %source, "transaction store ready");
        let report = BootstrapReport {
            source,
            count: store.transactions.len(),
            persist_error,
        };
        (store, report)
    }

    /// All transactions in insertion order.
    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn storage(&self) -> &dyn TransactionStorage {
        self.storage.as_ref()
    }

    /// Appends `transaction`. Fails with `DuplicateId` when its id is taken.
    pub fn add(&mut self, transaction: Transaction) -> StoreResult<()> {
        if self.contains(transaction.id) {
            return Err(StoreError::DuplicateId(transaction.id));
        }
        tracing::debug!(id = %transaction.id, label = %transaction.display_label(), "adding transaction");
        self.transactions.push(transaction);
        self.persist()
    }

    /// Replaces the record with the same id, keeping its position.
    pub fn update(&mut self, transaction: Transaction) -> StoreResult<()> {
        let index = self
            .position(transaction.id)
            .ok_or(StoreError::NotFound(transaction.id))?;
        tracing::debug!(id = %transaction.id, "replacing transaction");
        self.transactions[index] = transaction;
        self.persist()
    }

    /// Removes the record with `id`. A missing id is an error and changes nothing.
    pub fn delete(&mut self, id: Uuid) -> StoreResult<()> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        tracing::debug!(%id, "deleting transaction");
        self.transactions.remove(index);
        self.persist()
    }

    pub fn autosave(&self) -> bool {
        self.autosave
    }

    /// With autosave off, mutations only mark the store dirty until [`flush`](Self::flush).
    pub fn set_autosave(&mut self, autosave: bool) {
        self.autosave = autosave;
    }

    /// True when memory holds changes that storage has not accepted yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes pending changes, if any.
    pub fn flush(&mut self) -> StoreResult<()> {
        if !self.dirty {
            return Ok(());
        }
        self.write_snapshot()
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.transactions.iter().position(|txn| txn.id == id)
    }

    fn persist(&mut self) -> StoreResult<()> {
        self.dirty = true;
        if !self.autosave {
            return Ok(());
        }
        self.write_snapshot()
    }

    fn write_snapshot(&mut self) -> StoreResult<()> {
        match self.storage.save(&self.transactions) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist transactions; keeping in-memory state");
                Err(StoreError::Persistence(err))
            }
        }
    }
}
