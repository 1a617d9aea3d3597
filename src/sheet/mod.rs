//! First-worksheet loading into an in-memory cell grid.
//!
//! Inputs are read with `calamine`, so any container it recognizes (xlsx,
//! xlsm, xlsb, xls, ods) is accepted. Only the first worksheet is read.

mod layout;

pub use layout::{CellRange, CellStyle, SheetLayout};

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::core::{CellValue, Input, SaldoError};

static EMPTY: CellValue = CellValue::Empty;

/// A worksheet held as dense rows of cells, addressed 1-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    /// An empty sheet with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet from rows; the first row is row 1.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Load the first worksheet with resolved values only.
    ///
    /// Formula cells yield their cached results.
    pub fn load(bytes: &[u8], input: Input) -> Result<Self, SaldoError> {
        read_first_sheet(bytes, input, false)
    }

    /// Load the first worksheet, keeping formulas as [`CellValue::Formula`].
    pub fn load_with_formulas(bytes: &[u8], input: Input) -> Result<Self, SaldoError> {
        read_first_sheet(bytes, input, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of the last row that exists (0 for an empty sheet).
    pub fn max_row(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn max_column(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at a 1-based position; missing cells read as empty.
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        if row == 0 || col == 0 {
            return &EMPTY;
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .unwrap_or(&EMPTY)
    }

    /// Write a cell at a 1-based position, growing the grid as needed.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if row == 0 || col == 0 {
            return;
        }
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < col {
            if value.is_empty() {
                return;
            }
            cells.resize(col, CellValue::Empty);
        }
        cells[col - 1] = value;
    }

    /// Cells of a 1-based row; empty for rows past the end.
    pub fn row(&self, row: usize) -> &[CellValue] {
        if row == 0 {
            return &[];
        }
        self.rows.get(row - 1).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Header cells of a row, padded to the sheet width.
    pub fn header(&self, row: usize) -> Vec<CellValue> {
        let mut cells = self.row(row).to_vec();
        cells.resize(self.max_column().max(cells.len()), CellValue::Empty);
        cells
    }

    /// Drop every row after `last_kept`.
    pub fn truncate(&mut self, last_kept: usize) {
        self.rows.truncate(last_kept);
    }

    /// Non-empty cells as `(row, col, value)`, 1-based, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &CellValue)> {
        self.rows.iter().enumerate().flat_map(|(r, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_empty())
                .map(move |(c, v)| (r + 1, c + 1, v))
        })
    }
}

fn read_first_sheet(bytes: &[u8], input: Input, with_formulas: bool) -> Result<Grid, SaldoError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| SaldoError::Read(input, e.to_string()))?;

    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SaldoError::EmptyWorkbook(input))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SaldoError::EmptyWorkbook(input))?
        .map_err(|e| SaldoError::Read(input, e.to_string()))?;

    let mut grid = Grid::new(name.clone());
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    for (r, row) in range.rows().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let value = from_calamine(cell);
            if !value.is_empty() {
                grid.set(
                    start_row as usize + r + 1,
                    start_col as usize + c + 1,
                    value,
                );
            }
        }
    }

    if with_formulas {
        // Sheets without a formula part report an error; values stand as read.
        if let Ok(formulas) = workbook.worksheet_formula(&name) {
            let (f_row, f_col) = formulas.start().unwrap_or((0, 0));
            for (r, row) in formulas.rows().enumerate() {
                for (c, formula) in row.iter().enumerate() {
                    if !formula.is_empty() {
                        let text = formula.strip_prefix('=').unwrap_or(formula);
                        grid.set(
                            f_row as usize + r + 1,
                            f_col as usize + c + 1,
                            CellValue::Formula(text.to_string()),
                        );
                    }
                }
            }
        }
    }

    log::debug!(
        "loaded {input} sheet '{}': {} rows x {} columns",
        grid.name(),
        grid.max_row(),
        grid.max_column()
    );
    Ok(grid)
}

fn from_calamine(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

/// Excel column letters for a 1-based column (1 → `A`, 27 → `AA`).
pub fn column_letter(col: usize) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
