#![doc(test(attr(deny(warnings))))]

//! Finance Core records personal and business income and expenses and derives
//! summaries, monthly series, category reports and investment suggestions from
//! them. A JSON snapshot on disk keeps the collection between sessions.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod export;
pub mod format;
pub mod storage;
pub mod utils;

pub use crate::core::{services, TransactionStore};
pub use crate::domain::{AccountType, Transaction, TransactionKind};
pub use crate::errors::{FinanceError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
