//! Input-boundary validation for user-entered transactions.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::category::CategoryCatalog;
use crate::domain::transaction::{AccountType, Transaction, TransactionKind};
use crate::errors::ValidationErrors;

/// Raw, unvalidated transaction fields as captured from a form or command line.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: String,
    pub kind: TransactionKind,
    pub category: String,
    pub date: NaiveDate,
    pub account_type: AccountType,
    pub notes: Option<String>,
}

impl TransactionDraft {
    pub fn new(kind: TransactionKind, account_type: AccountType, date: NaiveDate) -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            kind,
            category: String::new(),
            date,
            account_type,
            notes: None,
        }
    }

    /// Prefills a draft from an existing record, as an edit form would.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount.to_string(),
            kind: transaction.kind,
            category: transaction.category.clone(),
            date: transaction.date,
            account_type: transaction.account_type,
            notes: transaction.notes.clone(),
        }
    }

    /// Builds a brand-new transaction with a fresh id.
    pub fn into_transaction(
        self,
        catalog: &CategoryCatalog,
    ) -> Result<Transaction, ValidationErrors> {
        let amount = self.validate(catalog)?;
        Ok(self.build(Uuid::new_v4(), Utc::now(), amount))
    }

    /// Builds the full replacement for `existing`, keeping its id and creation stamp.
    pub fn revise(
        self,
        existing: &Transaction,
        catalog: &CategoryCatalog,
    ) -> Result<Transaction, ValidationErrors> {
        let amount = self.validate(catalog)?;
        Ok(self.build(existing.id, existing.recorded_at, amount))
    }

    /// Checks every field and returns the parsed amount when all pass.
    pub fn validate(&self, catalog: &CategoryCatalog) -> Result<Decimal, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.description.trim().is_empty() {
            errors.push("description", "description is required");
        }

        let amount = parse_amount(&self.amount);
        match amount {
            Some(value) if value > Decimal::ZERO => {}
            _ => errors.push("amount", "enter a valid amount greater than 0"),
        }

        let category = self.category.trim();
        if category.is_empty() {
            errors.push("category", "select a category");
        } else if !catalog.allows(self.account_type, category) {
            errors.push(
                "category",
                format!("`{}` is not a {} category", category, self.account_type),
            );
        }

        errors.into_result(amount.unwrap_or_default())
    }

    fn build(self, id: Uuid, recorded_at: DateTime<Utc>, amount: Decimal) -> Transaction {
        let transaction = Transaction {
            id,
            description: self.description.trim().to_string(),
            amount,
            kind: self.kind,
            category: self.category.trim().to_string(),
            date: self.date,
            account_type: self.account_type,
            notes: None,
            recorded_at,
        };
        match self.notes {
            Some(notes) => transaction.with_notes(notes),
            None => transaction,
        }
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}
