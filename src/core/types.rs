use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::config::ReportConfig;
use super::error::SaldoError;

/// A single spreadsheet cell as read from (or written to) a worksheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value.
    #[default]
    Empty,
    /// Text.
    String(String),
    /// Floating-point number.
    Number(f64),
    /// Integer (xls/ods readers report these separately).
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// Date/time as an Excel serial number (1900 date system).
    DateTime(f64),
    /// Formula text without the leading `=`.
    Formula(String),
    /// Cell error such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    /// `true` for absent cells and empty strings.
    ///
    /// Whitespace-only text counts as data.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The text content if this is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Stringify the value the way it is used as a lookup key.
    ///
    /// Integral numbers drop their fractional part (`100.0` → `"100"`).
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Number(n) | CellValue::DateTime(n) => format_number(*n),
            CellValue::Int(i) => i.to_string(),
            CellValue::Bool(true) => "TRUE".into(),
            CellValue::Bool(false) => "FALSE".into(),
            CellValue::Formula(f) => format!("={f}"),
            CellValue::Error(e) => e.clone(),
        }
    }

    /// Interpret the cell as a calendar date.
    ///
    /// Accepts Excel serials (date or plain number cells) and text in
    /// `YYYY-MM-DD[...]` or `DD.MM.YYYY` form.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::DateTime(serial) | CellValue::Number(serial) => serial_to_date(*serial),
            CellValue::Int(serial) => serial_to_date(*serial as f64),
            CellValue::String(s) => parse_date_text(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Convert an Excel 1900-system serial to a date. Serials below 1 are not dates.
pub(crate) fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }
    // Day 0 is 1899-12-30 once the phantom 1900-02-29 is accounted for.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Excel 1900-system serial of a date.
#[cfg_attr(not(feature = "xlsx"), allow(dead_code))]
pub(crate) fn date_to_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    (date - epoch).num_days() as f64
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.split([' ', 'T']).next().unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%d.%m.%Y"))
        .ok()
}

/// Colour theme shared by both renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Teal header, near-white stripes (default).
    #[default]
    Blue,
    /// Slate header, light grey stripes.
    Gray,
    /// Sand header, cream stripes.
    Warm,
}

/// RGB colours of a [`Theme`], as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Header row fill.
    pub header: u32,
    /// Fill of every other data row.
    pub stripe: u32,
    /// Grid line colour.
    pub grid: u32,
}

impl Theme {
    /// All themes, in presentation order.
    pub const ALL: [Theme; 3] = [Theme::Blue, Theme::Gray, Theme::Warm];

    pub fn palette(self) -> Palette {
        match self {
            Theme::Blue => Palette {
                header: 0x25B3AD,
                stripe: 0xF9FEFD,
                grid: 0xE2E8F0,
            },
            Theme::Gray => Palette {
                header: 0x4A5568,
                stripe: 0xF7F7F7,
                grid: 0xD9D9D9,
            },
            Theme::Warm => Palette {
                header: 0xC6A875,
                stripe: 0xFFF9F2,
                grid: 0xEADDC8,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Blue => "blue",
            Theme::Gray => "gray",
            Theme::Warm => "warm",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = SaldoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(Theme::Blue),
            "gray" => Ok(Theme::Gray),
            "warm" => Ok(Theme::Warm),
            other => Err(SaldoError::InvalidOption(format!(
                "unknown theme '{other}' (expected blue, gray or warm)"
            ))),
        }
    }
}

/// Output format of [`crate::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Styled XLSX workbook.
    #[default]
    Workbook,
    /// Paginated PDF document.
    Document,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Workbook => f.write_str("workbook"),
            OutputFormat::Document => f.write_str("document"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SaldoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "workbook" | "xlsx" => Ok(OutputFormat::Workbook),
            "document" | "pdf" => Ok(OutputFormat::Document),
            other => Err(SaldoError::InvalidOption(format!(
                "unknown output format '{other}' (expected workbook or document)"
            ))),
        }
    }
}

/// Customer header block stamped onto the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFields {
    /// Customer name (Meno zákazníka).
    pub name: String,
    /// SAP business partner id.
    pub sap_id: String,
    /// Contract account number (Zmluvný účet).
    pub contract_account: String,
    /// Issuing company name.
    pub company_name: String,
}

/// Company name used when the caller leaves it blank.
pub const DEFAULT_COMPANY: &str = "SWAN a.s.";

impl Default for CustomerFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            sap_id: String::new(),
            contract_account: String::new(),
            company_name: DEFAULT_COMPANY.into(),
        }
    }
}

/// Builder for [`CustomerFields`].
///
/// ```
/// use saldo::core::CustomerFieldsBuilder;
///
/// let customer = CustomerFieldsBuilder::new("Ján Novák", "1000123", "500012345").build();
/// assert_eq!(customer.company_name, "SWAN a.s.");
/// ```
pub struct CustomerFieldsBuilder {
    fields: CustomerFields,
}

impl CustomerFieldsBuilder {
    pub fn new(
        name: impl Into<String>,
        sap_id: impl Into<String>,
        contract_account: impl Into<String>,
    ) -> Self {
        Self {
            fields: CustomerFields {
                name: name.into(),
                sap_id: sap_id.into(),
                contract_account: contract_account.into(),
                ..Default::default()
            },
        }
    }

    /// Override the company name. Blank input keeps the default.
    pub fn company_name(mut self, company: impl Into<String>) -> Self {
        let company = company.into();
        if !company.trim().is_empty() {
            self.fields.company_name = company;
        }
        self
    }

    pub fn build(self) -> CustomerFields {
        self.fields
    }
}

/// The four spreadsheet buffers a report is generated from.
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    /// Formatted template; its first sheet receives the report rows.
    pub template: &'a [u8],
    /// Lookup table: `Označenie pôvodu` → `Typ dokladu`.
    pub helper: &'a [u8],
    /// Transactions source (source 1).
    pub transactions: &'a [u8],
    /// Cross-reference source (source 2): `Číslo dokladu` → `Doplnková referencia`.
    pub references: &'a [u8],
}

impl<'a> Inputs<'a> {
    pub fn new(
        template: &'a [u8],
        helper: &'a [u8],
        transactions: &'a [u8],
        references: &'a [u8],
    ) -> Self {
        Self {
            template,
            helper,
            transactions,
            references,
        }
    }
}

/// Presentation options for [`crate::render`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    /// Logo image bytes (PNG, JPEG or GIF).
    pub logo: Option<Vec<u8>>,
    pub output_format: OutputFormat,
    /// Date printed as the generation date; `None` means today.
    pub generated_on: Option<NaiveDate>,
    pub config: ReportConfig,
}

/// Builder for [`RenderOptions`].
///
/// ```
/// use saldo::core::{OutputFormat, RenderOptionsBuilder, Theme};
///
/// let options = RenderOptionsBuilder::new(OutputFormat::Document)
///     .theme(Theme::Warm)
///     .build();
/// assert!(options.logo.is_none());
/// ```
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new(output_format: OutputFormat) -> Self {
        Self {
            options: RenderOptions {
                output_format,
                ..Default::default()
            },
        }
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.options.theme = theme;
        self
    }

    pub fn logo(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        self.options.logo = if bytes.is_empty() { None } else { Some(bytes) };
        self
    }

    pub fn generated_on(mut self, date: NaiveDate) -> Self {
        self.options.generated_on = Some(date);
        self
    }

    pub fn config(mut self, config: ReportConfig) -> Self {
        self.options.config = config;
        self
    }

    pub fn build(self) -> RenderOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_stringify_without_fraction() {
        assert_eq!(CellValue::Number(100.0).to_text(), "100");
        assert_eq!(CellValue::Number(-20.5).to_text(), "-20.5");
        assert_eq!(CellValue::Int(7).to_text(), "7");
    }

    #[test]
    fn empty_string_is_empty_but_whitespace_is_not() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::from("").is_empty());
        assert!(!CellValue::from(" ").is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn excel_serials_convert_to_dates() {
        let d = CellValue::DateTime(45292.0).as_date().unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(CellValue::Number(0.5).as_date(), None);
        assert_eq!(date_to_serial(d), 45292.0);
    }

    #[test]
    fn text_dates_parse() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(CellValue::from("2024-03-05 00:00:00").as_date(), expected);
        assert_eq!(CellValue::from("05.03.2024").as_date(), expected);
        assert_eq!(CellValue::from("n/a").as_date(), None);
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Warm".parse::<Theme>().unwrap(), Theme::Warm);
        assert!("purple".parse::<Theme>().is_err());
    }

    #[test]
    fn output_format_accepts_extension_aliases() {
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Document);
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Workbook);
    }

    #[test]
    fn blank_company_keeps_default() {
        let c = CustomerFieldsBuilder::new("A", "1", "2").company_name("  ").build();
        assert_eq!(c.company_name, DEFAULT_COMPANY);
    }
}
