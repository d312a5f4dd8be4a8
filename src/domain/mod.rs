pub mod category;
pub mod draft;
pub mod seed;
pub mod transaction;

pub use category::CategoryCatalog;
pub use draft::TransactionDraft;
pub use seed::seed_transactions;
pub use transaction::{AccountType, ParseTagError, Transaction, TransactionKind};
