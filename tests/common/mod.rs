#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use finance_core::{
    core::{BootstrapReport, TransactionStore},
    domain::{AccountType, Transaction, TransactionKind},
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn json_storage(base: &Path) -> JsonStorage {
    JsonStorage::new(Some(base.to_path_buf()), Some(3)).expect("create json storage backend")
}

/// Bootstraps a store over a fresh directory, seeded with the starter dataset.
pub fn setup_store() -> (TransactionStore, BootstrapReport, JsonStorage) {
    let base = temp_base();
    let storage = json_storage(&base);
    let (store, report) = TransactionStore::bootstrap(Box::new(storage.clone()));
    (store, report, storage)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn txn(
    description: &str,
    amount: Decimal,
    kind: TransactionKind,
    category: &str,
    date: NaiveDate,
    account_type: AccountType,
) -> Transaction {
    Transaction::new(description, amount, kind, category, date, account_type)
}
