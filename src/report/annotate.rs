use crate::core::{CellValue, is_label};
use crate::sheet::Grid;

use super::columns::TemplateColumns;
use super::references::ReferenceMap;

/// Fill the invoice-number column of rows `first..=last`.
///
/// Invoice rows get their cleaned reference (or nothing when the id has no
/// usable entry). Every other row is cleared, even if the map knows its id.
pub fn annotate_invoices(
    grid: &mut Grid,
    columns: &TemplateColumns,
    first: usize,
    last: usize,
    references: &ReferenceMap,
    invoice_type: &str,
) -> usize {
    let mut annotated = 0;
    for row in first..=last {
        let value = if is_label(grid.get(row, columns.document_type), invoice_type) {
            references
                .reference(grid.get(row, columns.document_id))
                .map(|r| CellValue::String(r.to_string()))
                .unwrap_or_default()
        } else {
            CellValue::Empty
        };
        if !value.is_empty() {
            annotated += 1;
        }
        grid.set(row, columns.invoice_number, value);
    }
    annotated
}
