//! Filtering and ordering of transaction views.

use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::NaiveDate;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::domain::{AccountType, ParseTagError, Transaction, TransactionKind};

/// Ordering applied to a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    DateAsc,
    #[default]
    DateDesc,
    AmountAsc,
    AmountDesc,
    DescriptionAsc,
    DescriptionDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::DateAsc,
        SortKey::DateDesc,
        SortKey::AmountAsc,
        SortKey::AmountDesc,
        SortKey::DescriptionAsc,
        SortKey::DescriptionDesc,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            SortKey::DateAsc => "date-asc",
            SortKey::DateDesc => "date-desc",
            SortKey::AmountAsc => "amount-asc",
            SortKey::AmountDesc => "amount-desc",
            SortKey::DescriptionAsc => "description-asc",
            SortKey::DescriptionDesc => "description-desc",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortKey::DateAsc => a.date.cmp(&b.date),
            SortKey::DateDesc => b.date.cmp(&a.date),
            SortKey::AmountAsc => a.amount.cmp(&b.amount),
            SortKey::AmountDesc => b.amount.cmp(&a.amount),
            SortKey::DescriptionAsc => collate(&a.description, &b.description),
            SortKey::DescriptionDesc => collate(&b.description, &a.description),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SortKey {
    type Err = ParseTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|key| key.tag() == wanted)
            .ok_or_else(|| ParseTagError::new("sort key", value))
    }
}

/// Filter and ordering parameters. Unset optional filters match everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub account_type: AccountType,
    pub search_text: Option<String>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sort: SortKey,
}

impl TransactionQuery {
    pub fn new(account_type: AccountType) -> Self {
        Self {
            account_type,
            search_text: None,
            kind: None,
            category: None,
            date_from: None,
            date_to: None,
            sort: SortKey::default(),
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// True when `txn` passes every set filter.
    pub fn matches(&self, txn: &Transaction) -> bool {
        if txn.account_type != self.account_type {
            return false;
        }
        if let Some(needle) = self.needle() {
            let hit = fold(&txn.description).contains(&needle)
                || fold(&txn.category).contains(&needle);
            if !hit {
                return false;
            }
        }
        if self.kind.is_some_and(|kind| txn.kind != kind) {
            return false;
        }
        if self
            .category
            .as_deref()
            .is_some_and(|category| txn.category != category)
        {
            return false;
        }
        if self.date_from.is_some_and(|from| txn.date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| txn.date > to) {
            return false;
        }
        true
    }

    fn needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(fold)
    }
}

pub struct QueryService;

impl QueryService {
    /// Returns the matching subset ordered by `query.sort`.
    ///
    /// The sort is stable, so records that compare equal keep their input order.
    pub fn query<'a>(
        transactions: &'a [Transaction],
        query: &TransactionQuery,
    ) -> Vec<&'a Transaction> {
        let mut matched: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| query.matches(txn))
            .collect();
        matched.sort_by(|a, b| query.sort.compare(a, b));
        matched
    }

    /// Distinct categories used within a partition, in first-seen order.
    pub fn categories_in(transactions: &[Transaction], account_type: AccountType) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for txn in transactions.iter().filter(|txn| txn.account_type == account_type) {
            if !categories.contains(&txn.category) {
                categories.push(txn.category.clone());
            }
        }
        categories
    }

    /// The `limit` most recent transactions of a partition, newest first.
    pub fn recent(
        transactions: &[Transaction],
        account_type: AccountType,
        limit: usize,
    ) -> Vec<&Transaction> {
        let query = TransactionQuery::new(account_type).sort(SortKey::DateDesc);
        let mut recent = Self::query(transactions, &query);
        recent.truncate(limit);
        recent
    }
}

fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Accent- and case-insensitive ordering. Texts equal under that fold fall back
/// to their lowercase form, so "Exito" precedes "Éxito".
fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| fold(a).cmp(&fold(b)))
}

fn base_letters(text: &str) -> String {
    text.nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn txn(
        description: &str,
        amount: Decimal,
        kind: TransactionKind,
        category: &str,
        day: u32,
        account_type: AccountType,
    ) -> Transaction {
        Transaction::new(
            description,
            amount,
            kind,
            category,
            NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            account_type,
        )
    }

    fn fixture() -> Vec<Transaction> {
        vec![
            txn(
                "Sueldo",
                dec!(2000),
                TransactionKind::Income,
                "Salario",
                1,
                AccountType::Personal,
            ),
            txn(
                "Cine",
                dec!(15),
                TransactionKind::Expense,
                "Entretenimiento",
                3,
                AccountType::Personal,
            ),
            txn(
                "Bus",
                dec!(2.5),
                TransactionKind::Expense,
                "Transporte",
                3,
                AccountType::Personal,
            ),
            txn(
                "Factura",
                dec!(900),
                TransactionKind::Income,
                "Ventas",
                4,
                AccountType::Business,
            ),
            txn(
                "cine club",
                dec!(30),
                TransactionKind::Expense,
                "Entretenimiento",
                9,
                AccountType::Personal,
            ),
        ]
    }

    fn descriptions(result: &[&Transaction]) -> Vec<String> {
        result.iter().map(|txn| txn.description.clone()).collect()
    }

    #[test]
    fn partitions_by_account_type() {
        let data = fixture();
        let result = QueryService::query(&data, &TransactionQuery::new(AccountType::Business));
        assert_eq!(descriptions(&result), ["Factura"]);
    }

    #[test]
    fn search_matches_description_or_category_case_insensitively() {
        let data = fixture();
        let by_description = QueryService::query(
            &data,
            &TransactionQuery::new(AccountType::Personal)
                .search("CINE")
                .sort(SortKey::DateAsc),
        );
        assert_eq!(descriptions(&by_description), ["Cine", "cine club"]);

        let by_category = QueryService::query(
            &data,
            &TransactionQuery::new(AccountType::Personal).search("transp"),
        );
        assert_eq!(descriptions(&by_category), ["Bus"]);
    }

    #[test]
    fn filters_compose_with_and() {
        let data = fixture();
        let query = TransactionQuery::new(AccountType::Personal)
            .kind(TransactionKind::Expense)
            .category("Entretenimiento")
            .between(NaiveDate::from_ymd_opt(2024, 4, 3), NaiveDate::from_ymd_opt(2024, 4, 3));
        assert_eq!(descriptions(&QueryService::query(&data, &query)), ["Cine"]);
    }

    #[test]
    fn blank_search_is_ignored_and_no_match_is_empty() {
        let data = fixture();
        let personal = TransactionQuery::new(AccountType::Personal);
        let all = QueryService::query(&data, &personal.clone().search("  "));
        assert_eq!(all.len(), 4);
        let none = QueryService::query(&data, &personal.search("zzz"));
        assert!(none.is_empty());
    }

    #[test]
    fn sorts_by_amount_both_ways() {
        let data = fixture();
        let asc = QueryService::query(
            &data,
            &TransactionQuery::new(AccountType::Personal).sort(SortKey::AmountAsc),
        );
        assert_eq!(descriptions(&asc), ["Bus", "Cine", "cine club", "Sueldo"]);
        let desc = QueryService::query(
            &data,
            &TransactionQuery::new(AccountType::Personal).sort(SortKey::AmountDesc),
        );
        assert_eq!(descriptions(&desc), ["Sueldo", "cine club", "Cine", "Bus"]);
    }

    #[test]
    fn date_desc_keeps_input_order_for_same_day() {
        let data = fixture();
        let result = QueryService::query(&data, &TransactionQuery::new(AccountType::Personal));
        assert_eq!(descriptions(&result), ["cine club", "Cine", "Bus", "Sueldo"]);
    }

    #[test]
    fn description_sort_places_accented_letters_with_their_base() {
        let data: Vec<Transaction> = ["Zapatos", "Óptica", "Agua", "Éxito", "exito"]
            .into_iter()
            .map(|description| {
                txn(
                    description,
                    dec!(1),
                    TransactionKind::Expense,
                    "Otros",
                    1,
                    AccountType::Personal,
                )
            })
            .collect();
        let asc = QueryService::query(
            &data,
            &TransactionQuery::new(AccountType::Personal).sort(SortKey::DescriptionAsc),
        );
        assert_eq!(descriptions(&asc), ["Agua", "exito", "Éxito", "Óptica", "Zapatos"]);
        let desc = QueryService::query(
            &data,
            &TransactionQuery::new(AccountType::Personal).sort(SortKey::DescriptionDesc),
        );
        assert_eq!(descriptions(&desc), ["Zapatos", "Óptica", "Éxito", "exito", "Agua"]);
    }

    #[test]
    fn description_sort_is_case_insensitive_and_stable() {
        let data = fixture();
        let asc = QueryService::query(
            &data,
            &TransactionQuery::new(AccountType::Personal).sort(SortKey::DescriptionAsc),
        );
        assert_eq!(descriptions(&asc), ["Bus", "Cine", "cine club", "Sueldo"]);
    }

    #[test]
    fn sort_tags_round_trip() {
        for key in SortKey::ALL {
            assert_eq!(key.tag().parse::<SortKey>(), Ok(key));
        }
        assert!("newest".parse::<SortKey>().is_err());
    }

    #[test]
    fn categories_and_recent_views() {
        let data = fixture();
        assert_eq!(
            QueryService::categories_in(&data, AccountType::Personal),
            ["Salario", "Entretenimiento", "Transporte"]
        );
        let recent = QueryService::recent(&data, AccountType::Personal, 2);
        assert_eq!(descriptions(&recent), ["cine club", "Cine"]);
    }
}
