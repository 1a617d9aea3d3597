use std::fmt;

use thiserror::Error;

use super::types::OutputFormat;

/// Errors that can occur while building or rendering a saldo report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SaldoError {
    /// An input buffer could not be parsed as a spreadsheet.
    #[error("cannot read {0} workbook: {1}")]
    Read(Input, String),

    /// An input workbook contains no worksheet.
    #[error("{0} workbook has no worksheet")]
    EmptyWorkbook(Input),

    /// The template header row lacks one or more of the eight report columns.
    ///
    /// Carries every missing canonical name, not just the first one.
    #[error("template is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A mapping input (helper or references) lacks its key/value columns.
    #[error("{input} workbook is missing columns: {}", quoted(.columns))]
    MissingMappingColumns {
        /// Which input was inspected.
        input: Input,
        /// Exact header names that were not found in its first row.
        columns: Vec<String>,
    },

    /// Workbook output failed.
    #[error("XLSX error: {0}")]
    Xlsx(String),

    /// Document output failed.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The supplied logo could not be decoded or embedded.
    #[error("logo error: {0}")]
    Logo(String),

    /// A theme or output-format string did not name a known option.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// The requested output format was compiled out of this build.
    #[error("{0} output is not enabled in this build")]
    Unsupported(OutputFormat),
}

/// Names the input buffer an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    /// Formatted report template.
    Template,
    /// Origin-code → document-type lookup table.
    Helper,
    /// Transactions (source 1).
    Transactions,
    /// Document-id → supplementary reference table (source 2).
    References,
    /// A previously generated report workbook.
    Report,
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Input::Template => "template",
            Input::Helper => "helper",
            Input::Transactions => "transactions",
            Input::References => "references",
            Input::Report => "report",
        };
        f.write_str(name)
    }
}

fn quoted(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
