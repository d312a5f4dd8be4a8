//! Totals, category breakdowns and monthly series over a transaction set.
//!
//! Callers pass transactions already restricted to one ledger partition; nothing
//! here filters by account type. Sums stay exact `Decimal`s and are never rounded.

use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;

use crate::domain::{Transaction, TransactionKind};

/// Longest series `monthly_series` builds (100 years).
pub const MAX_SERIES_MONTHS: usize = 1200;

const MONTH_LABELS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Income and expense sums for a transaction set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl Totals {
    pub fn balance(&self) -> Decimal {
        self.income - self.expenses
    }
}

/// One `(category, kind)` pair with its summed amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub kind: TransactionKind,
    pub total: Decimal,
}

/// Per-category sums kept separately for income and expenses.
///
/// Never holds a zero-valued entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    entries: BTreeMap<(String, TransactionKind), Decimal>,
}

impl CategoryTotals {
    pub fn get(&self, category: &str, kind: TransactionKind) -> Option<Decimal> {
        self.entries.get(&(category.to_string(), kind)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries ordered by category, then kind.
    pub fn iter(&self) -> impl Iterator<Item = CategoryTotal> + '_ {
        self.entries
            .iter()
            .map(|((category, kind), total)| CategoryTotal {
                category: category.clone(),
                kind: *kind,
                total: *total,
            })
    }

    /// Entries of one kind, largest total first; ties ordered by category name.
    pub fn for_kind(&self, kind: TransactionKind) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> =
            self.iter().filter(|entry| entry.kind == kind).collect();
        totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
        totals
    }

    /// Sum of every entry of one kind.
    pub fn sum(&self, kind: TransactionKind) -> Decimal {
        self.entries
            .iter()
            .filter(|((_, entry_kind), _)| *entry_kind == kind)
            .map(|(_, total)| *total)
            .sum()
    }
}

/// Income, expenses and net for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

impl MonthlyBucket {
    fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            label: month_label(month).to_string(),
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Running balance at the end of a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancePoint {
    pub label: String,
    pub balance: Decimal,
}

pub struct AggregationService;

impl AggregationService {
    pub fn totals(transactions: &[Transaction]) -> Totals {
        transactions.iter().fold(Totals::default(), |mut totals, txn| {
            match txn.kind {
                TransactionKind::Income => totals.income += txn.amount,
                TransactionKind::Expense => totals.expenses += txn.amount,
            }
            totals
        })
    }

    /// Sums amounts per `(category, kind)`.
    ///
    /// Non-positive amounts are summed like any other; a pair whose sum ends up
    /// at exactly zero is left out.
    pub fn category_totals(transactions: &[Transaction]) -> CategoryTotals {
        let mut entries: BTreeMap<(String, TransactionKind), Decimal> = BTreeMap::new();
        for txn in transactions {
            *entries
                .entry((txn.category.clone(), txn.kind))
                .or_insert(Decimal::ZERO) += txn.amount;
        }
        entries.retain(|_, total| !total.is_zero());
        CategoryTotals { entries }
    }

    /// Dense series of exactly `month_count` calendar months ending with the
    /// month of `today`, oldest first. Months without activity are zero.
    /// Counts above [`MAX_SERIES_MONTHS`] are capped to it.
    pub fn monthly_series(
        transactions: &[Transaction],
        month_count: usize,
        today: NaiveDate,
    ) -> Vec<MonthlyBucket> {
        let current = month_index(today.year(), today.month());
        let span = i64::try_from(month_count.min(MAX_SERIES_MONTHS)).unwrap_or_default();
        let first = current - span + 1;
        let mut buckets: Vec<MonthlyBucket> = (first..=current)
            .map(|index| {
                let (year, month) = from_month_index(index);
                MonthlyBucket::empty(year, month)
            })
            .collect();

        for txn in transactions {
            let index = month_index(txn.date.year(), txn.date.month());
            if index < first || index > current {
                continue;
            }
            let bucket = &mut buckets[(index - first) as usize];
            match txn.kind {
                TransactionKind::Income => bucket.income += txn.amount,
                TransactionKind::Expense => bucket.expenses += txn.amount,
            }
        }

        for bucket in &mut buckets {
            bucket.net = bucket.income - bucket.expenses;
        }
        buckets
    }

    /// [`monthly_series`](Self::monthly_series) anchored at the local calendar date.
    pub fn monthly_series_now(
        transactions: &[Transaction],
        month_count: usize,
    ) -> Vec<MonthlyBucket> {
        Self::monthly_series(transactions, month_count, Local::now().date_naive())
    }

    /// Running sum of `net`, starting from zero before the first month.
    pub fn cumulative_balance(series: &[MonthlyBucket]) -> Vec<BalancePoint> {
        series
            .iter()
            .scan(Decimal::ZERO, |balance, bucket| {
                *balance += bucket.net;
                Some(BalancePoint {
                    label: bucket.label.clone(),
                    balance: *balance,
                })
            })
            .collect()
    }
}

/// Spanish short month name for a 1-based month.
pub fn month_label(month: u32) -> &'static str {
    MONTH_LABELS[((month.clamp(1, 12)) - 1) as usize]
}

fn month_index(year: i32, month: u32) -> i64 {
    year as i64 * 12 + (month as i64 - 1)
}

fn from_month_index(index: i64) -> (i32, u32) {
    (index.div_euclid(12) as i32, (index.rem_euclid(12) + 1) as u32)
}
