use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{AccountType, Transaction};

use super::aggregation_service::{AggregationService, BalancePoint, CategoryTotals, MonthlyBucket};
use super::query_service::QueryService;
use super::suggestion_service::{Allocation, SuggestionService};

pub const DEFAULT_DASHBOARD_MONTHS: usize = 6;
pub const DEFAULT_REPORT_MONTHS: usize = 12;
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Headline figures for one ledger partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub account_type: AccountType,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
    /// Always zero for the business ledger.
    pub investment_reserve: Decimal,
    pub balance_ratio: Decimal,
    pub expense_ratio: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub months: usize,
    pub recent_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            months: DEFAULT_DASHBOARD_MONTHS,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub summary: AccountSummary,
    pub monthly: Vec<MonthlyBucket>,
    pub recent: Vec<Transaction>,
    /// Populated for the personal ledger only.
    pub allocations: Vec<Allocation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub account_type: AccountType,
    pub category_totals: CategoryTotals,
    pub monthly: Vec<MonthlyBucket>,
    pub balance_history: Vec<BalancePoint>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn account_summary(
        transactions: &[Transaction],
        account_type: AccountType,
    ) -> AccountSummary {
        let partition = partition(transactions, account_type);
        let totals = AggregationService::totals(&partition);
        let balance = totals.balance();
        let investment_reserve = match account_type {
            AccountType::Personal => SuggestionService::investment_reserve(&partition),
            AccountType::Business => Decimal::ZERO,
        };
        let denominator = if totals.income.is_zero() {
            Decimal::ONE
        } else {
            totals.income
        };
        AccountSummary {
            account_type,
            income: totals.income,
            expenses: totals.expenses,
            balance,
            investment_reserve,
            balance_ratio: balance / denominator,
            expense_ratio: totals.expenses / denominator,
        }
    }

    pub fn dashboard(
        transactions: &[Transaction],
        account_type: AccountType,
        options: &DashboardOptions,
        today: NaiveDate,
    ) -> Dashboard {
        let summary = Self::account_summary(transactions, account_type);
        let partition = partition(transactions, account_type);
        let monthly = AggregationService::monthly_series(&partition, options.months, today);
        let recent = QueryService::recent(transactions, account_type, options.recent_limit)
            .into_iter()
            .cloned()
            .collect();
        let allocations = match account_type {
            AccountType::Personal => {
                SuggestionService::investment_allocations(summary.investment_reserve)
            }
            AccountType::Business => Vec::new(),
        };
        Dashboard {
            summary,
            monthly,
            recent,
            allocations,
        }
    }

    pub fn report(
        transactions: &[Transaction],
        account_type: AccountType,
        month_count: usize,
        today: NaiveDate,
    ) -> Report {
        let partition = partition(transactions, account_type);
        let monthly = AggregationService::monthly_series(&partition, month_count, today);
        let balance_history = AggregationService::cumulative_balance(&monthly);
        Report {
            account_type,
            category_totals: AggregationService::category_totals(&partition),
            monthly,
            balance_history,
        }
    }
}

fn partition(transactions: &[Transaction], account_type: AccountType) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|txn| txn.account_type == account_type)
        .cloned()
        .collect()
}
