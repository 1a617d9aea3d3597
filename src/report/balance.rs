//! Running balance: the prefix sum of the amount column in row order.
//!
//! The workbook carries it as a chain of formulas, the document recomputes it
//! from the amounts with [`running_balances`]. Both use the same row range.

use rust_decimal::Decimal;

use crate::core::{CellValue, parse_amount};
use crate::sheet::{Grid, column_letter};

/// Last row below `header_row` whose `key_col` cell is non-empty, or
/// `header_row` itself when the region has none.
pub fn last_data_row(grid: &Grid, key_col: usize, header_row: usize) -> usize {
    (header_row + 1..=grid.max_row())
        .rev()
        .find(|&r| !grid.get(r, key_col).is_empty())
        .unwrap_or(header_row)
}

/// Prefix sums of the amounts. Cells that are not numbers count as zero.
pub fn running_balances<'a, I>(amounts: I) -> Vec<Decimal>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    amounts
        .into_iter()
        .scan(Decimal::ZERO, |total, amount| {
            *total += parse_amount(amount).unwrap_or(Decimal::ZERO);
            Some(*total)
        })
        .collect()
}

/// Formula text (without `=`) of the balance cell in `row`.
///
/// The first data row references its own amount; every later row adds its
/// amount to the balance above.
pub fn balance_formula(row: usize, first_row: usize, amount_col: usize, balance_col: usize) -> String {
    let amount = column_letter(amount_col);
    if row <= first_row {
        format!("{amount}{row}")
    } else {
        format!("{}{}+{amount}{row}", column_letter(balance_col), row - 1)
    }
}

/// Fill the balance column of rows `first..=last` with formulas.
pub fn write_balance_formulas(
    grid: &mut Grid,
    first: usize,
    last: usize,
    amount_col: usize,
    balance_col: usize,
) {
    for row in first..=last {
        grid.set(
            row,
            balance_col,
            CellValue::Formula(balance_formula(row, first, amount_col, balance_col)),
        );
    }
}
