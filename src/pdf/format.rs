use std::fmt::Write as _;

use chrono::NaiveDate;
use num_format::{CustomFormat, ToFormattedString};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::core::{CellValue, SaldoError, parse_amount, round_cents};

static GROUPING: Lazy<CustomFormat> =
    Lazy::new(|| CustomFormat::builder().separator(" ").build().unwrap_or_default());

/// Format money as `1 234,50 €`: space thousands separator, decimal comma,
/// non-breaking space before the currency sign.
pub fn format_money(value: Decimal) -> String {
    let rounded = round_cents(value).abs();
    let negative = value.is_sign_negative() && !rounded.is_zero();
    let units = rounded.trunc().to_u128().unwrap_or_default();
    let cents = (rounded.fract() * Decimal::ONE_HUNDRED).to_u32().unwrap_or_default();

    let sign = if negative { "-" } else { "" };
    format!(
        "{sign}{},{cents:02}\u{00A0}€",
        units.to_formatted_string(&*GROUPING)
    )
}

/// Reject a chrono date format that cannot render a calendar date.
///
/// Unknown specifiers and time-only fields would otherwise fail inside
/// `Display` when the document is laid out.
pub fn check_date_format(format: &str) -> Result<(), SaldoError> {
    let sample = NaiveDate::default();
    let mut out = String::new();
    write!(out, "{}", sample.format(format))
        .map_err(|_| SaldoError::InvalidOption(format!("date format '{format}'")))
}

/// Money text of an amount cell; empty when the cell is not a number.
pub fn money_cell(value: &CellValue) -> String {
    parse_amount(value).map(format_money).unwrap_or_default()
}

/// Date text of a cell in the given chrono format.
///
/// Cells that are not dates are shown as their text, trimmed.
pub fn date_cell(value: &CellValue, format: &str) -> String {
    match value.as_date() {
        Some(date) => date.format(format).to_string(),
        None => value.to_text().trim().to_string(),
    }
}
