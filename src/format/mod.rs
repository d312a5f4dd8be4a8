//! Presentation-boundary formatting. Amounts are rounded to two decimals here
//! and nowhere else.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";
const GROUPING_SEPARATOR: char = ',';
const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

pub trait CurrencyFormatter {
    fn format_amount(&self, amount: Decimal) -> String;
}

pub trait DateFormatter {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// `$1,234.50`, `-$12.00`, `05/07/2023`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainFormatter {
    symbol: String,
}

impl PlainFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SYMBOL)
    }
}

impl CurrencyFormatter for PlainFormatter {
    fn format_amount(&self, amount: Decimal) -> String {
        let rounded = round_cents(amount);
        let body = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body.as_str(), "00"));
        let grouped = group_digits(int_part, GROUPING_SEPARATOR);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{}{}{}.{}", sign, self.symbol, grouped, frac_part)
    }
}

impl DateFormatter for PlainFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// `ratio × 100`, rounded half away from zero, as `"48%"`.
pub fn percent(ratio: Decimal) -> String {
    let value = (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let value = if value.is_zero() { Decimal::ZERO } else { value };
    format!("{}%", value.normalize())
}

pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_grouped_amounts_with_cents() {
        let fmt = PlainFormatter::default();
        assert_eq!(fmt.format_amount(dec!(1234.5)), "$1,234.50");
        assert_eq!(fmt.format_amount(dec!(-12)), "-$12.00");
        assert_eq!(fmt.format_amount(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(fmt.format_amount(dec!(0.005)), "$0.01");
        assert_eq!(fmt.format_amount(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn custom_symbol_is_used() {
        assert_eq!(PlainFormatter::new("€").format_amount(dec!(999)), "€999.00");
    }

    #[test]
    fn dates_render_day_first() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 5).unwrap();
        assert_eq!(PlainFormatter::default().format_date(date), "05/07/2023");
    }

    #[test]
    fn percent_rounds_to_whole_numbers() {
        assert_eq!(percent(dec!(0.0482)), "5%");
        assert_eq!(percent(dec!(0.9518)), "95%");
        assert_eq!(percent(dec!(0.125)), "13%");
        assert_eq!(percent(dec!(-0.001)), "0%");
    }
}
