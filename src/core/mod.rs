//! Core report types, configuration, column lookup, and error handling.
//!
//! Everything here is output-format agnostic: the workbook and document
//! renderers both build on these types.

mod amount;
pub mod columns;
mod config;
mod error;
mod types;

pub use amount::{parse_amount, round_cents};
pub use columns::{find_column, find_column_any, find_exact_column, is_label, normalize_label};
pub use config::*;
pub use error::*;
pub use types::*;
#[cfg(feature = "xlsx")]
pub(crate) use types::date_to_serial;
