use serde::{Deserialize, Serialize};

/// Layout and wording of a saldo report.
///
/// The defaults describe the standard `TEMPLATE_saldo.xlsx`: header on row 9,
/// customer block in `B1:B4`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 1-based row holding the column headers.
    pub header_row: u32,
    /// 1-based column of the customer block.
    pub customer_column: u16,
    /// 1-based first row of the customer block (SAP id, name, company, contract account).
    pub customer_first_row: u32,
    /// Document type that carries a due date and an invoice number.
    pub invoice_type: String,
    /// Marker stripped from the front of supplementary references.
    pub reference_prefix: String,
    /// Workbook number format of the three date columns.
    pub date_format: String,
    /// Workbook number format of the amount and balance columns.
    pub amount_format: String,
    /// Workbook number format of the total balance cell.
    pub total_format: String,
    /// Workbook label left of the total balance cell.
    pub total_label: String,
    /// Document title.
    pub title: String,
    /// chrono format of dates in the document.
    pub document_date_format: String,
    /// Zero-based `(row, column)` where the workbook logo is anchored.
    pub logo_anchor: (u32, u16),
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            header_row: 9,
            customer_column: 2,
            customer_first_row: 1,
            invoice_type: "Faktúra".into(),
            reference_prefix: "VBRK".into(),
            date_format: "DD.MM.YY".into(),
            amount_format: "#,##0.00".into(),
            total_format: "#,##0.00 [$€-407]".into(),
            total_label: "Celkový zostatok:".into(),
            title: "Náhľad na fakturačný účet – saldo".into(),
            document_date_format: "%d.%m.%Y".into(),
            logo_anchor: (0, 0),
        }
    }
}

impl ReportConfig {
    /// First row of the data region.
    pub fn first_data_row(&self) -> u32 {
        self.header_row + 1
    }
}

/// Builder for [`ReportConfig`].
///
/// # Example
///
/// ```
/// use saldo::core::ReportConfigBuilder;
///
/// let config = ReportConfigBuilder::new()
///     .header_row(12)
///     .total_label("Total balance:")
///     .build();
/// assert_eq!(config.first_data_row(), 13);
/// ```
#[derive(Default)]
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

impl ReportConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the 1-based header row. Values below 1 are clamped to 1.
    pub fn header_row(mut self, row: u32) -> Self {
        self.config.header_row = row.max(1);
        self
    }

    /// Place the customer block at a 1-based column and first row.
    pub fn customer_block(mut self, column: u16, first_row: u32) -> Self {
        self.config.customer_column = column.max(1);
        self.config.customer_first_row = first_row.max(1);
        self
    }

    pub fn invoice_type(mut self, label: impl Into<String>) -> Self {
        self.config.invoice_type = label.into();
        self
    }

    pub fn reference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.reference_prefix = prefix.into();
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.config.date_format = format.into();
        self
    }

    pub fn amount_format(mut self, format: impl Into<String>) -> Self {
        self.config.amount_format = format.into();
        self
    }

    pub fn total_format(mut self, format: impl Into<String>) -> Self {
        self.config.total_format = format.into();
        self
    }

    pub fn total_label(mut self, label: impl Into<String>) -> Self {
        self.config.total_label = label.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn document_date_format(mut self, format: impl Into<String>) -> Self {
        self.config.document_date_format = format.into();
        self
    }

    pub fn logo_anchor(mut self, row: u32, column: u16) -> Self {
        self.config.logo_anchor = (row, column);
        self
    }

    pub fn build(self) -> ReportConfig {
        self.config
    }
}
