pub mod aggregation_service;
pub mod query_service;
pub mod suggestion_service;
pub mod summary_service;

pub use aggregation_service::{
    AggregationService, BalancePoint, CategoryTotal, CategoryTotals, MonthlyBucket, Totals,
    MAX_SERIES_MONTHS,
};
pub use query_service::{QueryService, SortKey, TransactionQuery};
pub use suggestion_service::{
    Allocation, InvestmentProfile, Suggestion, SuggestionService, INVESTMENT_PROFILES,
};
pub use summary_service::{AccountSummary, Dashboard, DashboardOptions, Report, SummaryService};
