//! Starter dataset written on first launch or after a corrupt snapshot.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::transaction::{AccountType, Transaction, TransactionKind};

struct SeedRow {
    description: &'static str,
    cents: i64,
    kind: TransactionKind,
    category: &'static str,
    day: u32,
    account_type: AccountType,
}

const SEED_ROWS: &[SeedRow] = &[
    SeedRow {
        description: "Salario mensual",
        cents: 250_000,
        kind: TransactionKind::Income,
        category: "Salario",
        day: 1,
        account_type: AccountType::Personal,
    },
    SeedRow {
        description: "Supermercado",
        cents: 12_050,
        kind: TransactionKind::Expense,
        category: "Alimentación",
        day: 5,
        account_type: AccountType::Personal,
    },
    SeedRow {
        description: "Pago de alquiler",
        cents: 80_000,
        kind: TransactionKind::Expense,
        category: "Vivienda",
        day: 10,
        account_type: AccountType::Personal,
    },
    SeedRow {
        description: "Trabajo freelance",
        cents: 35_000,
        kind: TransactionKind::Income,
        category: "Freelance",
        day: 15,
        account_type: AccountType::Personal,
    },
    SeedRow {
        description: "Venta de servicios",
        cents: 500_000,
        kind: TransactionKind::Income,
        category: "Ventas",
        day: 1,
        account_type: AccountType::Business,
    },
    SeedRow {
        description: "Compra de materiales",
        cents: 120_000,
        kind: TransactionKind::Expense,
        category: "Suministros",
        day: 8,
        account_type: AccountType::Business,
    },
    SeedRow {
        description: "Pago de impuestos",
        cents: 80_000,
        kind: TransactionKind::Expense,
        category: "Impuestos",
        day: 15,
        account_type: AccountType::Business,
    },
    SeedRow {
        description: "Proyecto completado",
        cents: 350_000,
        kind: TransactionKind::Income,
        category: "Servicios",
        day: 20,
        account_type: AccountType::Business,
    },
];

/// Builds the starter transactions, all dated July 2023, with fresh ids.
pub fn seed_transactions() -> Vec<Transaction> {
    SEED_ROWS
        .iter()
        .filter_map(|row| {
            let date = NaiveDate::from_ymd_opt(2023, 7, row.day)?;
            Some(Transaction::new(
                row.description,
                Decimal::new(row.cents, 2).normalize(),
                row.kind,
                row.category,
                date,
                row.account_type,
            ))
        })
        .collect()
}
