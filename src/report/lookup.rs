use std::collections::HashMap;

use crate::core::{CellValue, Input, SaldoError, find_exact_column};
use crate::sheet::Grid;

/// Helper column holding the origin code.
pub const ORIGIN_COLUMN: &str = "Označenie pôvodu";
/// Helper column holding the document type.
pub const TYPE_COLUMN: &str = "Typ dokladu";

/// Origin code → document type, loaded from the helper workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    map: HashMap<String, CellValue>,
}

impl LookupTable {
    /// Build the table from the helper sheet (headers in row 1).
    ///
    /// Rows whose origin code is not non-empty text are skipped. Repeated
    /// origin codes overwrite earlier entries.
    pub fn from_grid(grid: &Grid) -> Result<Self, SaldoError> {
        let headers = grid.header(1);
        let origin = find_exact_column(&headers, ORIGIN_COLUMN);
        let doc_type = find_exact_column(&headers, TYPE_COLUMN);
        let (Some(origin), Some(doc_type)) = (origin, doc_type) else {
            return Err(SaldoError::MissingMappingColumns {
                input: Input::Helper,
                columns: [(origin, ORIGIN_COLUMN), (doc_type, TYPE_COLUMN)]
                    .into_iter()
                    .filter(|(pos, _)| pos.is_none())
                    .map(|(_, name)| name.to_string())
                    .collect(),
            });
        };

        let mut map = HashMap::new();
        let mut overwritten = 0usize;
        for row in 2..=grid.max_row() {
            let Some(code) = grid.get(row, origin).as_str() else {
                continue;
            };
            let code = code.trim();
            if code.is_empty() {
                continue;
            }
            let value = match grid.get(row, doc_type) {
                CellValue::String(s) => CellValue::String(s.trim().to_string()),
                other => other.clone(),
            };
            if map.insert(code.to_string(), value).is_some() {
                overwritten += 1;
            }
        }
        if overwritten > 0 {
            log::debug!("helper lookup: {overwritten} repeated origin codes overwritten");
        }
        log::debug!("helper lookup: {} origin codes", map.len());
        Ok(Self { map })
    }

    /// Document type for an origin-code cell. Only text codes are looked up.
    pub fn document_type(&self, origin: &CellValue) -> Option<&CellValue> {
        origin.as_str().and_then(|code| self.map.get(code.trim()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for LookupTable {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}
