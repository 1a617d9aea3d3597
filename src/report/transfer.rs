use crate::core::{CellValue, find_exact_column, is_label};
use crate::sheet::Grid;

use super::columns::TemplateColumns;
use super::lookup::LookupTable;

/// Transaction columns copied into the report, matched exactly in row 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceColumns {
    pub document_id: Option<usize>,
    pub issue_date: Option<usize>,
    pub posting_date: Option<usize>,
    pub due_date: Option<usize>,
    pub origin: Option<usize>,
    pub amount: Option<usize>,
}

impl SourceColumns {
    /// Locate the transaction columns. Each one is optional.
    pub fn locate(source: &Grid) -> Self {
        let headers = source.header(1);
        let find = |name: &str| find_exact_column(&headers, name);
        Self {
            document_id: find("Číslo dokladu"),
            issue_date: find("Dátum zadania"),
            posting_date: find("Dátum účtovania"),
            due_date: find("Splatnosť netto"),
            origin: find("Označenie pôvodu"),
            amount: find("Čiastka"),
        }
    }
}

/// Copies non-blank transaction rows into the template's data region.
pub struct RowTransfer<'a> {
    pub columns: &'a TemplateColumns,
    pub lookup: &'a LookupTable,
    /// Document type whose rows keep their due date.
    pub invoice_type: &'a str,
}

impl RowTransfer<'_> {
    /// Clear everything below `header_row`, then write one report row per
    /// non-blank transaction row, in source order.
    ///
    /// Returns the number of rows written.
    pub fn run(&self, template: &mut Grid, header_row: usize, source: &Grid) -> usize {
        template.truncate(header_row);

        let src = SourceColumns::locate(source);
        let pick = |col: Option<usize>, row: usize| {
            col.map(|c| source.get(row, c).clone())
                .unwrap_or_default()
        };

        let mut target = header_row + 1;
        for row in 2..=source.max_row() {
            if source.row(row).iter().all(CellValue::is_empty) {
                continue;
            }
            let origin = pick(src.origin, row);
            let doc_type = self
                .lookup
                .document_type(&origin)
                .cloned()
                .unwrap_or_default();
            let due = if is_label(&doc_type, self.invoice_type) {
                pick(src.due_date, row)
            } else {
                CellValue::Empty
            };

            let c = self.columns;
            template.set(target, c.document_id, pick(src.document_id, row));
            template.set(target, c.issue_date, pick(src.issue_date, row));
            template.set(target, c.posting_date, pick(src.posting_date, row));
            template.set(target, c.due_date, due);
            template.set(target, c.document_type, doc_type);
            template.set(target, c.amount, pick(src.amount, row));
            target += 1;
        }
        target - header_row - 1
    }
}
