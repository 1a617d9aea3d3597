//! # saldo
//!
//! Customer balance statements ("saldo") from spreadsheet exports.
//!
//! A report is built from four workbooks: a formatted template, a helper
//! table mapping origin codes to document types, the transactions export and
//! a cross-reference export carrying invoice numbers. The transactions are
//! copied into the template below its header row, document types are
//! remapped, running balances are chained down the balance column and
//! invoice rows get their invoice numbers. The result is rendered as a
//! themed XLSX workbook or a paginated A4 PDF.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point
//! sums.
//!
//! ## Quick Start
//!
//! ```no_run
//! use saldo::core::{CustomerFieldsBuilder, Inputs, OutputFormat, RenderOptionsBuilder};
//!
//! let template = std::fs::read("template.xlsx").unwrap();
//! let helper = std::fs::read("helper.xlsx").unwrap();
//! let source1 = std::fs::read("source1.xlsx").unwrap();
//! let source2 = std::fs::read("source2.xlsx").unwrap();
//!
//! let customer = CustomerFieldsBuilder::new("Ján Novák", "1000123", "500012345").build();
//! let options = RenderOptionsBuilder::new(OutputFormat::Workbook).build();
//! let inputs = Inputs::new(&template, &helper, &source1, &source2);
//! let xlsx = saldo::render(&inputs, &customer, &options).unwrap();
//! std::fs::write("saldo.xlsx", xlsx).unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! The cell model, configuration and report pipeline are always compiled.
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `xlsx` (default) | Workbook output via `rust_xlsxwriter`, template formatting via `umya-spreadsheet` |
//! | `pdf` (default) | Document output via `lopdf` |
//! | `all` | Everything |

pub mod core;
pub mod report;
pub mod sheet;

#[cfg(feature = "xlsx")]
pub mod xlsx;

#[cfg(feature = "pdf")]
pub mod pdf;

mod render;

pub use render::render;

// Re-export core types at crate root for convenience
pub use crate::core::*;
pub use crate::report::Report;
