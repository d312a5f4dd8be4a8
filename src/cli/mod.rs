//! Command-line front end over the transaction store.

mod commands;
pub mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::core::services::{SortKey, TransactionQuery, MAX_SERIES_MONTHS};
use crate::domain::{AccountType, TransactionKind};
use crate::errors::Result;

pub use commands::Session;

#[derive(Parser, Debug)]
#[command(name = "finance_core_cli", version)]
#[command(about = "Track personal and business income and expenses")]
pub struct Cli {
    /// Directory holding the transaction snapshot and configuration
    /// (defaults to `FINANCE_CORE_HOME` or `~/.finance_core`).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Totals, recent activity and suggestions for one ledger.
    Summary(AccountArgs),
    /// List transactions matching the given filters.
    List(ListArgs),
    /// Record a new transaction.
    Add(AddArgs),
    /// Edit fields of an existing transaction.
    Update(UpdateArgs),
    /// Remove a transaction by id.
    Delete {
        id: Uuid,
    },
    /// Category breakdown and monthly history.
    Report(ReportArgs),
    /// Investment allocation suggestion from personal income.
    Suggest,
    /// Write the filtered view as CSV.
    Export(ExportArgs),
    /// Categories accepted for a ledger.
    Categories(AccountArgs),
    /// Snapshot backups of the transaction file.
    Backup(BackupArgs),
    /// Show build information.
    Version,
}

#[derive(Args, Debug)]
pub struct AccountArgs {
    #[arg(long, short, default_value_t = AccountType::Personal)]
    pub account: AccountType,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[arg(long, short, default_value_t = AccountType::Personal)]
    pub account: AccountType,
    /// Case-insensitive text matched against description and category.
    #[arg(long, short)]
    pub search: Option<String>,
    /// `ingreso`/`income` or `egreso`/`expense`.
    #[arg(long, short)]
    pub kind: Option<TransactionKind>,
    #[arg(long, short)]
    pub category: Option<String>,
    /// Earliest date, inclusive (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Latest date, inclusive (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// One of date-asc, date-desc, amount-asc, amount-desc, description-asc, description-desc.
    #[arg(long)]
    pub sort: Option<SortKey>,
}

impl QueryArgs {
    pub fn to_query(&self, default_sort: SortKey) -> TransactionQuery {
        let mut query = TransactionQuery::new(self.account)
            .between(self.from, self.to)
            .sort(self.sort.unwrap_or(default_sort));
        if let Some(text) = &self.search {
            query = query.search(text.clone());
        }
        if let Some(kind) = self.kind {
            query = query.kind(kind);
        }
        if let Some(category) = &self.category {
            query = query.category(category.clone());
        }
        query
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub query: QueryArgs,
    /// Print the matching records as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long, short, default_value_t = AccountType::Personal)]
    pub account: AccountType,
    #[arg(long, short)]
    pub kind: TransactionKind,
    #[arg(long, short)]
    pub description: String,
    #[arg(long)]
    pub amount: String,
    #[arg(long, short)]
    pub category: String,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: Uuid,
    #[arg(long, short)]
    pub account: Option<AccountType>,
    #[arg(long, short)]
    pub kind: Option<TransactionKind>,
    #[arg(long, short)]
    pub description: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long, short)]
    pub category: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Replaces the notes; pass an empty string to clear them.
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long, short, default_value_t = AccountType::Personal)]
    pub account: AccountType,
    /// Months of history (1 to 1200); defaults to the configured report length.
    #[arg(
        long,
        short,
        value_parser = clap::value_parser!(u16).range(1..=MAX_SERIES_MONTHS as i64)
    )]
    pub months: Option<u16>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub query: QueryArgs,
    /// Destination file; defaults to `transacciones_<account>_<date>.csv`
    /// in the current directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Write to standard output instead of a file.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Label appended to the backup file name.
    #[arg(long)]
    pub note: Option<String>,
    /// List existing backups instead of writing one.
    #[arg(long, conflicts_with_all = ["note", "restore"])]
    pub list: bool,
    /// Replace the live snapshot with the named backup.
    #[arg(long, value_name = "NAME", conflicts_with = "note")]
    pub restore: Option<String>,
}

/// Runs one parsed command to completion.
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    if matches!(cli.command, Command::Version) {
        commands::version();
        return Ok(());
    }
    let mut session = Session::open(cli.data_dir)?;
    session.execute(cli.command)?;
    session.close()
}
