//! Transaction store and the pure services computed over its contents.

pub mod services;
pub mod store;

pub use store::{BootstrapReport, SnapshotSource, TransactionStore};
