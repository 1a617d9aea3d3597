//! Trailing total row of the workbook.
//!
//! The summary is best-effort: [`write_summary_or_skip`] logs a failure and
//! leaves the sheet without a total instead of failing the render.

use rust_decimal::Decimal;
use rust_xlsxwriter::{Formula, Worksheet, XlsxError};
use thiserror::Error;

use crate::report::Report;
use crate::sheet::column_letter;

use super::style::Styles;

#[derive(Debug, Error)]
enum SummaryError {
    #[error("report has no data rows")]
    NoRows,

    #[error("balance column {0} has no column to its left for the label")]
    NoLabelColumn(String),

    #[error(transparent)]
    Xlsx(#[from] XlsxError),
}

/// Write the total two rows below the last data row, or log why not.
pub(crate) fn write_summary_or_skip(
    sheet: &mut Worksheet,
    report: &Report,
    styles: &Styles,
    total: Decimal,
) {
    match write_summary(sheet, report, styles, total) {
        Ok(row) => log::debug!("workbook total written to row {row}"),
        Err(e) => log::warn!("skipping workbook total: {e}"),
    }
}

/// Returns the 1-based row the total landed in.
fn write_summary(
    sheet: &mut Worksheet,
    report: &Report,
    styles: &Styles,
    total: Decimal,
) -> Result<usize, SummaryError> {
    let first = report.first_data_row();
    let last = report.last_data_row();
    if last < first {
        return Err(SummaryError::NoRows);
    }
    let columns = report.columns();
    if columns.balance < 2 {
        return Err(SummaryError::NoLabelColumn(column_letter(columns.balance)));
    }

    let row = last + 2;
    let amount = column_letter(columns.amount);
    let formula = Formula::new(format!("=SUM({amount}{first}:{amount}{last})"))
        .set_result(total.normalize().to_string());

    let xl_row = (row - 1) as u32;
    sheet.write_formula_with_format(xl_row, (columns.balance - 1) as u16, formula, &styles.total)?;
    sheet.write_string_with_format(
        xl_row,
        (columns.balance - 2) as u16,
        &report.config().total_label,
        &styles.total_label,
    )?;
    Ok(row)
}
