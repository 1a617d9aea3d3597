//! Workbook output: the report sheet re-emitted as a themed XLSX file.
//!
//! The template's values and formulas are written back. Rows above the
//! header keep the template's merges, fonts, fills and heights; columns
//! outside the report keep their widths and the page keeps its orientation.
//! The header row and the data region are styled by the theme.
//!
//! ```no_run
//! use saldo::core::{CustomerFields, Inputs, RenderOptions, ReportConfig};
//! use saldo::report::Report;
//!
//! # fn run(inputs: Inputs<'_>) -> Result<(), saldo::core::SaldoError> {
//! let report = Report::generate(&inputs, &CustomerFields::default(), &ReportConfig::default())?;
//! let bytes = saldo::xlsx::to_xlsx(&report, &RenderOptions::default())?;
//! std::fs::write("saldo.xlsx", bytes).ok();
//! # Ok(())
//! # }
//! ```

mod style;
mod summary;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Formula, Image, Workbook, Worksheet, XlsxError};

use crate::core::{CellValue, RenderOptions, SaldoError, date_to_serial, parse_amount};
use crate::report::{Report, SemanticColumn};

use style::{CellKind, Styles, column_width, template_format, width_pixels};
use summary::write_summary_or_skip;

/// Edge length in pixels of the box the logo is scaled into.
const LOGO_SIZE: u32 = 64;

/// Render a report as a styled XLSX workbook.
pub fn to_xlsx(report: &Report, options: &RenderOptions) -> Result<Vec<u8>, SaldoError> {
    let styles = Styles::new(options.theme.palette(), report.config());
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    if let Err(e) = sheet.set_name(report.grid().name()) {
        log::warn!("keeping default sheet name: {e}");
    }

    write_template_layout(sheet, report).map_err(xlsx_error)?;
    write_sheet(sheet, report, &styles).map_err(xlsx_error)?;

    for (column, position) in report.columns().iter() {
        sheet
            .set_column_width((position - 1) as u16, column_width(column))
            .map_err(xlsx_error)?;
    }

    if let Some(bytes) = &options.logo {
        let image = Image::new_from_buffer(bytes)
            .map_err(|e| SaldoError::Logo(e.to_string()))?
            .set_scale_to_size(LOGO_SIZE, LOGO_SIZE, true);
        let (row, col) = report.config().logo_anchor;
        sheet.insert_image(row, col, &image).map_err(xlsx_error)?;
    }

    write_summary_or_skip(sheet, report, &styles, report.final_balance());

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn xlsx_error(e: XlsxError) -> SaldoError {
    SaldoError::Xlsx(e.to_string())
}

/// Formatting of the template above the header row, written before any value.
fn write_template_layout(sheet: &mut Worksheet, report: &Report) -> Result<(), XlsxError> {
    let layout = report.layout();
    let header_row = report.header_row();

    for range in &layout.merges {
        if range.last_row >= header_row {
            log::debug!("dropping template merge {range:?}: reaches the report region");
            continue;
        }
        let format = layout
            .styles
            .get(&(range.first_row, range.first_col))
            .map(|style| template_format(style, None))
            .unwrap_or_default();
        let (r0, c0) = position(range.first_row, range.first_col);
        let (r1, c1) = position(range.last_row, range.last_col);
        if let Err(e) = sheet.merge_range(r0, c0, r1, c1, "", &format) {
            log::warn!("dropping template merge {range:?}: {e}");
        }
    }

    for ((row, col), style) in layout.styles_above(header_row) {
        if report.grid().get(row, col).is_empty() {
            let (r, c) = position(row, col);
            sheet.write_blank(r, c, &template_format(style, None))?;
        }
    }

    for (&row, &height) in layout.row_heights.range(1..header_row) {
        sheet.set_row_height((row - 1) as u32, height)?;
    }

    let report_columns: Vec<usize> = report.columns().iter().map(|(_, p)| p).collect();
    for (&col, &width) in &layout.column_widths {
        if col >= 1 && !report_columns.contains(&col) {
            sheet.set_column_width_pixels((col - 1) as u16, width_pixels(width))?;
        }
    }

    if layout.landscape {
        sheet.set_landscape();
    }
    Ok(())
}

fn write_sheet(sheet: &mut Worksheet, report: &Report, styles: &Styles) -> Result<(), XlsxError> {
    let grid = report.grid();
    let header_row = report.header_row();
    let first = report.first_data_row();
    let last = report.last_data_row();
    let width = grid.max_column();

    let mut semantic: Vec<Option<SemanticColumn>> = vec![None; width + 1];
    for (column, position) in report.columns().iter() {
        if position <= width {
            semantic[position] = Some(column);
        }
    }

    let layout = report.layout();
    let date_format = report.config().date_format.as_str();
    for (row, col, value) in grid.cells() {
        if row == header_row || (first..=last).contains(&row) {
            continue;
        }
        let is_date = matches!(value, CellValue::DateTime(_));
        let template = if row < header_row {
            layout.styles.get(&(row, col))
        } else {
            None
        };
        let owned;
        let format = match template {
            Some(style) => {
                owned = template_format(style, is_date.then_some(date_format));
                &owned
            }
            None if is_date => &styles.date,
            None => &styles.plain,
        };
        write_plain(sheet, row, col, value, format)?;
    }

    for col in 1..=width {
        let (r, c) = position(header_row, col);
        match grid.get(header_row, col) {
            CellValue::Empty => sheet.write_blank(r, c, &styles.header)?,
            value => sheet.write_string_with_format(r, c, value.to_text(), &styles.header)?,
        };
    }

    let balances = report.running_balances();
    let balance_col = report.columns().balance;
    for (i, row) in (first..=last).enumerate() {
        let stripe = i % 2 == 0;
        for col in 1..=width {
            let kind = CellKind::of(semantic[col]);
            let cached = (col == balance_col).then(|| balances.get(i).copied()).flatten();
            write_data(
                sheet,
                (row, col),
                grid.get(row, col),
                styles.body(kind, stripe),
                kind,
                cached,
            )?;
        }
    }
    Ok(())
}

/// Zero-based worksheet position of a 1-based grid cell.
fn position(row: usize, col: usize) -> (u32, u16) {
    ((row - 1) as u32, (col - 1) as u16)
}

/// Cells outside the header row and the data region, in their template format.
fn write_plain(
    sheet: &mut Worksheet,
    row: usize,
    col: usize,
    value: &CellValue,
    format: &Format,
) -> Result<(), XlsxError> {
    let (r, c) = position(row, col);
    match value {
        CellValue::Empty => return Ok(()),
        CellValue::String(s) | CellValue::Error(s) => sheet.write_string_with_format(r, c, s, format)?,
        CellValue::Number(n) | CellValue::DateTime(n) => sheet.write_number_with_format(r, c, *n, format)?,
        CellValue::Int(i) => sheet.write_number_with_format(r, c, *i as f64, format)?,
        CellValue::Bool(b) => sheet.write_boolean_with_format(r, c, *b, format)?,
        CellValue::Formula(f) => sheet.write_formula_with_format(r, c, Formula::new(f.as_str()), format)?,
    };
    Ok(())
}

/// Write one data-region cell.
///
/// Text that reads as a date (in date columns) or an amount (in money
/// columns) is written as a number so the cell format and formulas apply.
/// `cached` becomes the stored result of a formula.
fn write_data(
    sheet: &mut Worksheet,
    (row, col): (usize, usize),
    value: &CellValue,
    format: &Format,
    kind: CellKind,
    cached: Option<Decimal>,
) -> Result<(), XlsxError> {
    let (r, c) = position(row, col);
    match value {
        CellValue::Empty => sheet.write_blank(r, c, format)?,
        CellValue::String(s) => match text_as_number(value, kind) {
            Some(n) => sheet.write_number_with_format(r, c, n, format)?,
            None => sheet.write_string_with_format(r, c, s, format)?,
        },
        CellValue::Number(n) | CellValue::DateTime(n) => {
            sheet.write_number_with_format(r, c, *n, format)?
        }
        CellValue::Int(i) => sheet.write_number_with_format(r, c, *i as f64, format)?,
        CellValue::Bool(b) => sheet.write_boolean_with_format(r, c, *b, format)?,
        CellValue::Formula(f) => {
            let mut formula = Formula::new(f.as_str());
            if let Some(result) = cached {
                formula = formula.set_result(result.normalize().to_string());
            }
            sheet.write_formula_with_format(r, c, formula, format)?
        }
        CellValue::Error(e) => sheet.write_string_with_format(r, c, e, format)?,
    };
    Ok(())
}

fn text_as_number(value: &CellValue, kind: CellKind) -> Option<f64> {
    match kind {
        CellKind::Date => value.as_date().map(date_to_serial),
        CellKind::Money => parse_amount(value).and_then(|d| d.to_f64()),
        CellKind::Text => None,
    }
}
