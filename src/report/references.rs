use std::collections::HashMap;

use crate::core::{CellValue, Input, SaldoError, find_exact_column};
use crate::sheet::Grid;

/// Source-2 column holding the document id.
pub const DOCUMENT_COLUMN: &str = "Číslo dokladu";
/// Source-2 column holding the supplementary reference.
pub const REFERENCE_COLUMN: &str = "Doplnková referencia";

/// Document id → cleaned supplementary reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMap {
    map: HashMap<String, String>,
}

impl ReferenceMap {
    /// Build the map from the references sheet (headers in row 1).
    ///
    /// `prefix` is stripped case-insensitively from text references.
    pub fn from_grid(grid: &Grid, prefix: &str) -> Result<Self, SaldoError> {
        let headers = grid.header(1);
        let doc = find_exact_column(&headers, DOCUMENT_COLUMN);
        let reference = find_exact_column(&headers, REFERENCE_COLUMN);
        let (Some(doc), Some(reference)) = (doc, reference) else {
            return Err(SaldoError::MissingMappingColumns {
                input: Input::References,
                columns: [(doc, DOCUMENT_COLUMN), (reference, REFERENCE_COLUMN)]
                    .into_iter()
                    .filter(|(pos, _)| pos.is_none())
                    .map(|(_, name)| name.to_string())
                    .collect(),
            });
        };

        let mut map = HashMap::new();
        for row in 2..=grid.max_row() {
            let key = grid.get(row, doc);
            if key.is_empty() {
                continue;
            }
            let cleaned = clean_reference(grid.get(row, reference), prefix);
            map.insert(key.to_text().trim().to_string(), cleaned);
        }
        log::debug!("reference map: {} document ids", map.len());
        Ok(Self { map })
    }

    /// Cleaned reference for a document id, if present and non-empty.
    pub fn reference(&self, document_id: &CellValue) -> Option<&str> {
        if document_id.is_empty() {
            return None;
        }
        self.map
            .get(document_id.to_text().trim())
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Clean a raw supplementary reference.
///
/// Text is trimmed; a leading `prefix` (any case) is dropped and the rest
/// trimmed again. Other non-empty values are stringified; empty yields `""`.
pub fn clean_reference(raw: &CellValue, prefix: &str) -> String {
    match raw {
        CellValue::String(s) => {
            let s = s.trim();
            match strip_prefix_ignore_case(s, prefix) {
                Some(rest) => rest.trim().to_string(),
                None => s.to_string(),
            }
        }
        CellValue::Empty => String::new(),
        other => other.to_text(),
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let mut chars = s.char_indices();
    for p in prefix.chars() {
        let (_, c) = chars.next()?;
        if !c.to_uppercase().eq(p.to_uppercase()) {
            return None;
        }
    }
    let rest = chars.next().map_or(s.len(), |(i, _)| i);
    Some(&s[rest..])
}
