use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Failures raised by durable storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Failures raised by the transaction store.
///
/// `Persistence` is reported after the in-memory mutation has been applied;
/// the store stays authoritative for the session and callers may log and continue.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Transaction {0} already exists")]
    DuplicateId(Uuid),
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),
}

impl StoreError {
    /// True when the requested change is live in memory despite the error.
    pub fn is_applied(&self) -> bool {
        matches!(self, StoreError::Persistence(_))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collected validation failures for a transaction draft, one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("Invalid transaction: {}", join_fields(.fields))]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Message recorded for `field`, if that field failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.fields.iter()
    }

    /// Converts the collection into a `Result`, succeeding with `value` when empty.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures while loading or saving user configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

/// Failures while writing CSV exports.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Export produced invalid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Unified error type for front ends that drive the whole crate.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, FinanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_display_every_field() {
        let mut errors = ValidationErrors::new();
        errors.push("description", "description is required");
        errors.push("amount", "amount must be greater than 0");

        let message = errors.to_string();
        assert!(message.contains("description: description is required"));
        assert!(message.contains("amount: amount must be greater than 0"));
        assert_eq!(errors.get("amount"), Some("amount must be greater than 0"));
        assert_eq!(errors.get("category"), None);
    }

    #[test]
    fn only_persistence_errors_are_applied() {
        let id = Uuid::new_v4();
        assert!(!StoreError::NotFound(id).is_applied());
        assert!(!StoreError::DuplicateId(id).is_applied());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert!(StoreError::Persistence(StorageError::Io(io)).is_applied());
    }
}
