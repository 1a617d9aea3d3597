use std::fmt;

use crate::core::{CellValue, SaldoError, find_column_any, normalize_label};

/// Canonical label written over a matched issue-date header.
pub const ISSUE_DATE_LABEL: &str = "Dátum vystavenia / Pripísania platby";

/// The eight columns of the report region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticColumn {
    DocumentId,
    InvoiceNumber,
    IssueDate,
    PostingDate,
    DueDate,
    DocumentType,
    Amount,
    Balance,
}

impl SemanticColumn {
    /// Resolution order; also the order of missing names in errors.
    pub const ALL: [SemanticColumn; 8] = [
        SemanticColumn::DocumentId,
        SemanticColumn::InvoiceNumber,
        SemanticColumn::IssueDate,
        SemanticColumn::PostingDate,
        SemanticColumn::DueDate,
        SemanticColumn::DocumentType,
        SemanticColumn::Amount,
        SemanticColumn::Balance,
    ];

    /// Header spellings accepted for this column, tried in order.
    pub fn spellings(self) -> &'static [&'static str] {
        match self {
            SemanticColumn::DocumentId => &["Číslo dokladu"],
            SemanticColumn::InvoiceNumber => &["číslo Faktúry", "Číslo Faktúry"],
            SemanticColumn::IssueDate => &[
                ISSUE_DATE_LABEL,
                "Dátum vystavenia/Pripísania platby",
                "Dátum vystavenia /\nPripísania platby",
                "Dátum zadania",
            ],
            SemanticColumn::PostingDate => &["Dátum účtovania"],
            SemanticColumn::DueDate => &["Splatnosť netto"],
            SemanticColumn::DocumentType => &["Typ dokladu"],
            SemanticColumn::Amount => &["Čiastka"],
            SemanticColumn::Balance => &["Zostatok"],
        }
    }

    /// Name reported when the column is missing.
    pub fn canonical_name(self) -> &'static str {
        match self {
            SemanticColumn::InvoiceNumber => "Číslo Faktúry/číslo Faktúry",
            SemanticColumn::IssueDate => {
                "Dátum vystavenia / Pripísania platby / Dátum zadania"
            }
            other => other.spellings()[0],
        }
    }

    /// Short label used in the document table header.
    pub fn document_label(self) -> &'static str {
        match self {
            SemanticColumn::DocumentId => "Č. dokladu",
            SemanticColumn::InvoiceNumber => "Č. faktúry",
            SemanticColumn::IssueDate => "Dátum vystavenia /\nPripísania platby",
            SemanticColumn::PostingDate => "Dátum účt.",
            SemanticColumn::DueDate => "Splatnosť",
            SemanticColumn::DocumentType => "Typ dokladu",
            SemanticColumn::Amount => "Čiastka",
            SemanticColumn::Balance => "Zostatok",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(
            self,
            SemanticColumn::IssueDate | SemanticColumn::PostingDate | SemanticColumn::DueDate
        )
    }

    pub fn is_money(self) -> bool {
        matches!(self, SemanticColumn::Amount | SemanticColumn::Balance)
    }
}

impl fmt::Display for SemanticColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// 1-based positions of the eight report columns in the template header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateColumns {
    pub document_id: usize,
    pub invoice_number: usize,
    pub issue_date: usize,
    pub posting_date: usize,
    pub due_date: usize,
    pub document_type: usize,
    pub amount: usize,
    pub balance: usize,
}

impl TemplateColumns {
    /// Resolve all eight columns from a header row.
    ///
    /// Fails with every missing column listed when any does not resolve.
    pub fn resolve(headers: &[CellValue]) -> Result<Self, SaldoError> {
        let mut found = [0usize; 8];
        let mut missing = Vec::new();
        for (slot, column) in found.iter_mut().zip(SemanticColumn::ALL) {
            match find_column_any(headers, column.spellings()) {
                Some(pos) => *slot = pos,
                None => missing.push(column.canonical_name().to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(SaldoError::MissingColumns(missing));
        }
        let [
            document_id,
            invoice_number,
            issue_date,
            posting_date,
            due_date,
            document_type,
            amount,
            balance,
        ] = found;
        Ok(Self {
            document_id,
            invoice_number,
            issue_date,
            posting_date,
            due_date,
            document_type,
            amount,
            balance,
        })
    }

    /// Position of one semantic column.
    pub fn get(&self, column: SemanticColumn) -> usize {
        match column {
            SemanticColumn::DocumentId => self.document_id,
            SemanticColumn::InvoiceNumber => self.invoice_number,
            SemanticColumn::IssueDate => self.issue_date,
            SemanticColumn::PostingDate => self.posting_date,
            SemanticColumn::DueDate => self.due_date,
            SemanticColumn::DocumentType => self.document_type,
            SemanticColumn::Amount => self.amount,
            SemanticColumn::Balance => self.balance,
        }
    }

    /// `(column, position)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SemanticColumn, usize)> + '_ {
        SemanticColumn::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// `true` when an issue-date header should be relabelled to [`ISSUE_DATE_LABEL`].
pub(crate) fn is_legacy_issue_date_header(header: &CellValue) -> bool {
    let Some(text) = header.as_str() else {
        return false;
    };
    let norm = normalize_label(text);
    SemanticColumn::IssueDate
        .spellings()
        .iter()
        .any(|s| normalize_label(s) == norm)
        && text != ISSUE_DATE_LABEL
}
