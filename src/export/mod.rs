//! CSV export of a filtered transaction view.

use std::io;

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};

use crate::{
    domain::{AccountType, Transaction},
    errors::ExportError,
};

pub const CSV_HEADER: [&str; 5] = ["Fecha", "Descripción", "Categoría", "Tipo", "Monto"];

/// Writes `transactions` in the order given, header first.
///
/// Description and category are always wrapped in double quotes; the other
/// columns never are.
pub fn write_csv<'a, W, I>(writer: W, transactions: I) -> Result<W, ExportError>
where
    W: io::Write,
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    let mut rows = 0usize;
    for txn in transactions {
        csv.write_record([
            txn.date.format("%Y-%m-%d").to_string(),
            quoted(&txn.description),
            quoted(&txn.category),
            txn.kind.tag().to_string(),
            txn.amount.normalize().to_string(),
        ])?;
        rows += 1;
    }
    csv.flush()?;
    tracing::debug!(rows, "exported transactions as csv");
    csv.into_inner().map_err(|err| ExportError::Io(err.into_error()))
}

pub fn to_csv_string<'a, I>(transactions: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let bytes = write_csv(Vec::new(), transactions)?;
    Ok(String::from_utf8(bytes)?)
}

/// `transacciones_<account type>_<YYYY-MM-DD>.csv`
pub fn default_file_name(account_type: AccountType, today: NaiveDate) -> String {
    format!(
        "transacciones_{}_{}.csv",
        account_type.tag(),
        today.format("%Y-%m-%d")
    )
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
