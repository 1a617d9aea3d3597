//! Report generation: the template's first sheet filled with transaction rows.
//!
//! The pipeline is a single pass:
//!
//! 1. resolve the eight report columns in the template header row,
//! 2. load the helper lookup table and the reference map,
//! 3. clear the data region and copy every non-blank transaction row,
//! 4. chain the running-balance formulas down to the last row with a document id,
//! 5. fill invoice numbers on invoice rows,
//! 6. stamp the customer block.
//!
//! Every input is parsed and validated before the template is touched, so a
//! failure never leaves a half-written region behind.

mod annotate;
mod balance;
mod columns;
mod lookup;
mod references;
mod transfer;

pub use annotate::annotate_invoices;
pub use balance::{balance_formula, last_data_row, running_balances, write_balance_formulas};
pub use columns::{ISSUE_DATE_LABEL, SemanticColumn, TemplateColumns};
pub use lookup::LookupTable;
pub use references::{ReferenceMap, clean_reference};
pub use transfer::{RowTransfer, SourceColumns};

use rust_decimal::Decimal;

use crate::core::{CellValue, CustomerFields, Input, Inputs, ReportConfig, SaldoError, is_label};
use crate::sheet::{Grid, SheetLayout};

/// A generated saldo report: the transformed template sheet plus the
/// positions needed to render it.
#[derive(Debug, Clone)]
pub struct Report {
    grid: Grid,
    layout: SheetLayout,
    columns: TemplateColumns,
    customer: CustomerFields,
    config: ReportConfig,
    rows_written: usize,
}

/// One row of the report region, borrowed from the sheet.
#[derive(Debug, Clone, Copy)]
pub struct ReportRow<'a> {
    /// 1-based sheet row.
    pub row: usize,
    pub document_id: &'a CellValue,
    pub invoice_number: &'a CellValue,
    pub issue_date: &'a CellValue,
    pub posting_date: &'a CellValue,
    pub due_date: &'a CellValue,
    pub document_type: &'a CellValue,
    pub amount: &'a CellValue,
    /// Whether the document type is the configured invoice type.
    pub is_invoice: bool,
}

impl Report {
    /// Run the pipeline over the four input workbooks.
    pub fn generate(
        inputs: &Inputs<'_>,
        customer: &CustomerFields,
        config: &ReportConfig,
    ) -> Result<Self, SaldoError> {
        let header_row = config.header_row as usize;

        let mut grid = Grid::load_with_formulas(inputs.template, Input::Template)?;
        let layout = SheetLayout::capture(inputs.template);
        let columns = TemplateColumns::resolve(&grid.header(header_row))?;
        log::debug!("template columns: {columns:?}");

        let lookup = LookupTable::from_grid(&Grid::load(inputs.helper, Input::Helper)?)?;
        let transactions = Grid::load(inputs.transactions, Input::Transactions)?;
        let references = ReferenceMap::from_grid(
            &Grid::load(inputs.references, Input::References)?,
            &config.reference_prefix,
        )?;

        let issue_header = grid.get(header_row, columns.issue_date);
        if columns::is_legacy_issue_date_header(issue_header) {
            grid.set(header_row, columns.issue_date, ISSUE_DATE_LABEL.into());
        }

        let rows_written = RowTransfer {
            columns: &columns,
            lookup: &lookup,
            invoice_type: &config.invoice_type,
        }
        .run(&mut grid, header_row, &transactions);

        let first = header_row + 1;
        let last = last_data_row(&grid, columns.document_id, header_row);
        let mut annotated = 0;
        if last >= first {
            write_balance_formulas(&mut grid, first, last, columns.amount, columns.balance);
            annotated = annotate_invoices(
                &mut grid,
                &columns,
                first,
                last,
                &references,
                &config.invoice_type,
            );
        }

        stamp_customer(&mut grid, config, customer);

        let report = Self {
            grid,
            layout,
            columns,
            customer: customer.clone(),
            config: config.clone(),
            rows_written,
        };
        log::info!(
            "saldo report for '{}': {} rows, {} invoice numbers, final balance {}",
            customer.name,
            rows_written,
            annotated,
            report.final_balance()
        );
        Ok(report)
    }

    /// Read back a finished report workbook (resolved values only).
    ///
    /// The customer block is taken from its configured cells. Running
    /// balances are recomputed from the amount column on demand, never read
    /// from the sheet.
    pub fn from_workbook(bytes: &[u8], config: &ReportConfig) -> Result<Self, SaldoError> {
        let header_row = config.header_row as usize;
        let grid = Grid::load(bytes, Input::Report)?;
        let columns = TemplateColumns::resolve(&grid.header(header_row))?;

        let col = config.customer_column as usize;
        let first = config.customer_first_row as usize;
        let field = |offset: usize| grid.get(first + offset, col).to_text();
        let customer = CustomerFields {
            sap_id: field(0),
            name: field(1),
            company_name: field(2),
            contract_account: field(3),
        };

        let rows_written = last_data_row(&grid, columns.document_id, header_row) - header_row;
        Ok(Self {
            grid,
            layout: SheetLayout::capture(bytes),
            columns,
            customer,
            config: config.clone(),
            rows_written,
        })
    }

    /// The transformed first sheet.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Formatting of the template sheet, applied to rows above the header.
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn columns(&self) -> &TemplateColumns {
        &self.columns
    }

    pub fn customer(&self) -> &CustomerFields {
        &self.customer
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn header_row(&self) -> usize {
        self.config.header_row as usize
    }

    pub fn first_data_row(&self) -> usize {
        self.header_row() + 1
    }

    /// Last row holding a document id; equals the header row when empty.
    pub fn last_data_row(&self) -> usize {
        last_data_row(&self.grid, self.columns.document_id, self.header_row())
    }

    /// Number of transaction rows copied into the region.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Rows from the first data row through the last row with a document id.
    pub fn rows(&self) -> Vec<ReportRow<'_>> {
        let c = &self.columns;
        let g = &self.grid;
        (self.first_data_row()..=self.last_data_row())
            .map(|row| ReportRow {
                row,
                document_id: g.get(row, c.document_id),
                invoice_number: g.get(row, c.invoice_number),
                issue_date: g.get(row, c.issue_date),
                posting_date: g.get(row, c.posting_date),
                due_date: g.get(row, c.due_date),
                document_type: g.get(row, c.document_type),
                amount: g.get(row, c.amount),
                is_invoice: is_label(g.get(row, c.document_type), &self.config.invoice_type),
            })
            .collect()
    }

    /// Running balance of every row, recomputed from the amount column.
    pub fn running_balances(&self) -> Vec<Decimal> {
        running_balances(self.rows().into_iter().map(|r| r.amount))
    }

    /// Balance after the last row (zero for an empty report).
    pub fn final_balance(&self) -> Decimal {
        self.running_balances().last().copied().unwrap_or(Decimal::ZERO)
    }
}

fn stamp_customer(grid: &mut Grid, config: &ReportConfig, customer: &CustomerFields) {
    let col = config.customer_column as usize;
    let first = config.customer_first_row as usize;
    let values = [
        &customer.sap_id,
        &customer.name,
        &customer.company_name,
        &customer.contract_account,
    ];
    for (offset, value) in values.into_iter().enumerate() {
        grid.set(first + offset, col, CellValue::String(value.clone()));
    }
}
