use std::{fs, io, path::PathBuf};

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    config::{Config, ConfigManager},
    core::{
        services::{
            Dashboard, MonthlyBucket, QueryService, Report, SuggestionService, SummaryService,
        },
        SnapshotSource, TransactionStore,
    },
    domain::{AccountType, CategoryCatalog, Transaction, TransactionDraft, TransactionKind},
    errors::{ExportError, FinanceError, Result, StorageError, StoreError, StoreResult},
    export,
    format::{percent, CurrencyFormatter, DateFormatter, PlainFormatter},
    storage::JsonStorage,
    utils::{build_info, paths::resolve_base},
};

use super::{
    output, AddArgs, BackupArgs, Command, ExportArgs, ListArgs, ReportArgs, UpdateArgs,
};

/// Store, storage handle and preferences for one CLI invocation.
pub struct Session {
    store: TransactionStore,
    storage: JsonStorage,
    config: Config,
    formatter: PlainFormatter,
    today: NaiveDate,
}

impl Session {
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let base = resolve_base(data_dir);
        let config = ConfigManager::new(Some(base.clone()))?.load()?;
        let storage = JsonStorage::new(Some(base), Some(config.backup_retention))?;
        let (mut store, report) = TransactionStore::bootstrap(Box::new(storage.clone()));
        if report.source == SnapshotSource::SeededCorrupt {
            output::warning(format!(
                "Saved transactions were unreadable and have been replaced with {} sample records.",
                report.count
            ));
        }
        if let Some(err) = report.persist_error {
            output::warning(format!("Sample data could not be saved: {err}"));
        }
        store.set_autosave(config.autosave);
        Ok(Self {
            formatter: PlainFormatter::new(config.currency_symbol.clone()),
            store,
            storage,
            config,
            today: Local::now().date_naive(),
        })
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Summary(args) => self.summary(args.account),
            Command::List(args) => self.list(&args)?,
            Command::Add(args) => self.add(args)?,
            Command::Update(args) => self.update(args)?,
            Command::Delete { id } => {
                applied(self.store.delete(id))?;
                output::success(format!("Deleted transaction {id}"));
            }
            Command::Report(args) => self.report(&args),
            Command::Suggest => self.suggest(),
            Command::Export(args) => self.export(&args)?,
            Command::Categories(args) => self.categories(args.account),
            Command::Backup(args) => self.backup(&args)?,
            Command::Version => version(),
        }
        Ok(())
    }

    /// Writes anything left pending when autosave is off.
    pub fn close(mut self) -> Result<()> {
        applied(self.store.flush())
    }

    fn summary(&self, account: AccountType) {
        let dashboard = SummaryService::dashboard(
            self.store.list(),
            account,
            &self.config.dashboard_options(),
            self.today,
        );
        self.print_dashboard(&dashboard);
    }

    fn list(&self, args: &ListArgs) -> Result<()> {
        let query = args.query.to_query(self.config.default_sort);
        let matched = QueryService::query(self.store.list(), &query);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&matched).map_err(StorageError::from)?);
            return Ok(());
        }
        if matched.is_empty() {
            output::info("No transactions match.");
            return Ok(());
        }
        for txn in &matched {
            println!("{}", self.row(txn));
        }
        output::info(format!("{} transaction(s)", matched.len()));
        Ok(())
    }

    fn add(&mut self, args: AddArgs) -> Result<()> {
        let draft = TransactionDraft {
            description: args.description,
            amount: args.amount,
            kind: args.kind,
            category: args.category,
            date: args.date.unwrap_or(self.today),
            account_type: args.account,
            notes: args.notes,
        };
        let transaction = draft.into_transaction(CategoryCatalog::standard())?;
        let id = transaction.id;
        applied(self.store.add(transaction))?;
        output::success(format!("Added transaction {id}"));
        Ok(())
    }

    fn update(&mut self, args: UpdateArgs) -> Result<()> {
        let existing = self
            .store
            .get(args.id)
            .cloned()
            .ok_or(StoreError::NotFound(args.id))?;
        let mut draft = TransactionDraft::from_transaction(&existing);
        if let Some(account) = args.account {
            draft.account_type = account;
        }
        if let Some(kind) = args.kind {
            draft.kind = kind;
        }
        if let Some(description) = args.description {
            draft.description = description;
        }
        if let Some(amount) = args.amount {
            draft.amount = amount;
        }
        if let Some(category) = args.category {
            draft.category = category;
        }
        if let Some(date) = args.date {
            draft.date = date;
        }
        if let Some(notes) = args.notes {
            draft.notes = Some(notes).filter(|text| !text.trim().is_empty());
        }
        let revised = draft.revise(&existing, CategoryCatalog::standard())?;
        applied(self.store.update(revised))?;
        output::success(format!("Updated transaction {}", args.id));
        Ok(())
    }

    fn report(&self, args: &ReportArgs) {
        let months = args
            .months
            .map(usize::from)
            .unwrap_or(self.config.report_months);
        let report = SummaryService::report(self.store.list(), args.account, months, self.today);
        self.print_report(&report);
    }

    fn suggest(&self) {
        let suggestion = SuggestionService::suggest(self.store.list());
        output::section("Investment suggestion");
        println!("Reserve (10% of personal income): {}", self.money(suggestion.reserve));
        if suggestion.allocations.is_empty() {
            output::info("Record personal income to receive a suggestion.");
            return;
        }
        for allocation in &suggestion.allocations {
            let risk = allocation.profile().map(|profile| profile.risk).unwrap_or("-");
            println!(
                "  {:<40} {:>5}  {:>14}  risk: {}",
                allocation.name,
                percent(allocation.allocation_ratio),
                self.money(allocation.suggested_amount),
                risk
            );
        }
    }

    fn export(&self, args: &ExportArgs) -> Result<()> {
        let query = args.query.to_query(self.config.default_sort);
        let matched = QueryService::query(self.store.list(), &query);
        if args.stdout {
            let stdout = io::stdout();
            export::write_csv(stdout.lock(), matched.iter().copied())?;
            return Ok(());
        }
        let path = args.output.clone().unwrap_or_else(|| {
            PathBuf::from(export::default_file_name(args.query.account, self.today))
        });
        let file = fs::File::create(&path).map_err(ExportError::from)?;
        export::write_csv(io::BufWriter::new(file), matched.iter().copied())?;
        output::success(format!(
            "Exported {} transaction(s) to {}",
            matched.len(),
            path.display()
        ));
        Ok(())
    }

    fn categories(&self, account: AccountType) {
        output::section(format!("{} categories", account.label()));
        for category in CategoryCatalog::standard().categories(account) {
            println!("  {category}");
        }
        let used = QueryService::categories_in(self.store.list(), account);
        if !used.is_empty() {
            output::info(format!("In use: {}", used.join(", ")));
        }
    }

    fn backup(&mut self, args: &BackupArgs) -> Result<()> {
        if args.list {
            let backups = self.storage.list_backups()?;
            if backups.is_empty() {
                output::info("No backups yet.");
            }
            for name in backups {
                println!("{name}");
            }
            return Ok(());
        }
        if let Some(name) = &args.restore {
            let restored = self.storage.restore(name)?;
            output::success(format!("Restored {} transaction(s) from {name}", restored.len()));
            let (store, _) = TransactionStore::bootstrap(Box::new(self.storage.clone()));
            self.store = store;
            self.store.set_autosave(self.config.autosave);
            return Ok(());
        }
        applied(self.store.flush())?;
        match self.storage.backup(args.note.as_deref())? {
            Some(path) => output::success(format!("Backup written to {}", path.display())),
            None => output::info("Nothing to back up yet."),
        }
        Ok(())
    }

    fn print_dashboard(&self, dashboard: &Dashboard) {
        let summary = &dashboard.summary;
        output::section(format!("{} summary", summary.account_type.label()));
        println!("Income    {:>16}", self.money(summary.income));
        println!("Expenses  {:>16}", self.money(summary.expenses));
        println!(
            "Balance   {}  ({} of income)",
            output::signed(
                format!("{:>16}", self.money(summary.balance)),
                summary.balance.is_sign_negative()
            ),
            percent(summary.balance_ratio)
        );
        println!("Spent     {:>16}", percent(summary.expense_ratio));
        if summary.account_type == AccountType::Personal {
            println!("Reserve   {:>16}", self.money(summary.investment_reserve));
        }

        output::section(format!("Last {} months", dashboard.monthly.len()));
        self.print_months(&dashboard.monthly);

        output::section("Recent transactions");
        if dashboard.recent.is_empty() {
            output::info("No transactions yet.");
        }
        for txn in &dashboard.recent {
            println!("{}", self.row(txn));
        }

        if !dashboard.allocations.is_empty() {
            output::section("Suggested allocations");
            for allocation in &dashboard.allocations {
                println!(
                    "  {:<40} {:>14}",
                    allocation.name,
                    self.money(allocation.suggested_amount)
                );
            }
        }
    }

    fn print_report(&self, report: &Report) {
        output::section(format!("{} report", report.account_type.label()));
        for kind in TransactionKind::ALL {
            let totals = report.category_totals.for_kind(kind);
            if totals.is_empty() {
                continue;
            }
            println!("{}:", kind.label());
            for entry in totals {
                println!("  {:<24} {:>14}", entry.category, self.money(entry.total));
            }
        }
        output::section("Monthly");
        self.print_months(&report.monthly);
        output::section("Cumulative balance");
        for point in &report.balance_history {
            println!(
                "  {:<5} {}",
                point.label,
                output::signed(
                    format!("{:>14}", self.money(point.balance)),
                    point.balance.is_sign_negative()
                )
            );
        }
    }

    fn print_months(&self, months: &[MonthlyBucket]) {
        for bucket in months {
            println!(
                "  {} {}  in {:>14}  out {:>14}  net {}",
                bucket.label,
                bucket.year,
                self.money(bucket.income),
                self.money(bucket.expenses),
                output::signed(
                    format!("{:>14}", self.money(bucket.net)),
                    bucket.net.is_sign_negative()
                )
            );
        }
    }

    fn row(&self, txn: &Transaction) -> String {
        let amount = output::signed(
            format!("{:>14}", self.money(txn.signed_amount())),
            txn.is_expense(),
        );
        format!(
            "{}  {}  {:<16}  {}  [{}]",
            self.formatter.format_date(txn.date),
            amount,
            txn.category,
            txn.description,
            txn.id
        )
    }

    fn money(&self, amount: Decimal) -> String {
        self.formatter.format_amount(amount)
    }
}

pub fn version() {
    println!("{}", build_info::current());
}

/// Treats a persistence failure as a warning: the change is already live in
/// memory for the rest of the invocation.
fn applied(result: StoreResult<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_applied() => {
            output::warning(format!("Change kept in memory but not saved: {err}"));
            Ok(())
        }
        Err(err) => Err(FinanceError::from(err)),
    }
}
