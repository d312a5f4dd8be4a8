use std::{
    io,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex, MutexGuard,
    },
};

use crate::{domain::Transaction, errors::StorageError};

use super::{Result, TransactionStorage};

/// In-process storage that keeps the serialized snapshot in memory.
///
/// Holding JSON text rather than typed values lets callers stage corrupt
/// snapshots and exercise the same decode path as the file backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<String>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `raw` as the stored snapshot text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            snapshot: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    pub fn with_transactions(transactions: &[Transaction]) -> Result<Self> {
        Ok(Self::with_raw(serde_json::to_string(transactions)?))
    }

    /// Makes every subsequent `save` fail with an IO error until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves performed so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn raw(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<String>>> {
        self.snapshot.lock().map_err(|_| {
            StorageError::Io(io::Error::new(
                io::ErrorKind::Other,
                "memory storage lock poisoned",
            ))
        })
    }
}

impl TransactionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<Transaction>>> {
        match self.lock()?.as_deref() {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|err| StorageError::Corrupt(err.to_string())),
        }
    }

    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::Other,
                "simulated write failure",
            )));
        }
        let json = serde_json::to_string(transactions)?;
        *self.lock()? = Some(json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed_transactions;

    #[test]
    fn empty_storage_loads_nothing() {
        assert!(MemoryStorage::new().load().unwrap().is_none());
    }

    #[test]
    fn failed_write_keeps_previous_snapshot() {
        let storage = MemoryStorage::new();
        let seed = seed_transactions();
        storage.save(&seed).unwrap();
        storage.set_fail_writes(true);
        assert!(storage.save(&seed[..1]).is_err());
        assert_eq!(storage.load().unwrap().unwrap().len(), seed.len());
        assert_eq!(storage.save_count(), 1);
    }
}
