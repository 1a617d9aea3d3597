//! Template formatting carried into the workbook output.
//!
//! [`Grid`](super::Grid) holds values only. Merged ranges, cell fonts and
//! fills, column widths, row heights and page orientation are read here with
//! `umya-spreadsheet` when workbook output is compiled in. Containers it
//! cannot open (xls, ods) give an empty layout and the report renders with
//! its own styling alone.

use std::collections::BTreeMap;

/// Rectangular range, 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl CellRange {
    /// Parse an A1 reference such as `B2` or `$A$1:D1`.
    pub fn parse(reference: &str) -> Option<Self> {
        let (start, end) = reference.split_once(':').unwrap_or((reference, reference));
        let (r0, c0) = parse_cell(start)?;
        let (r1, c1) = parse_cell(end)?;
        Some(Self {
            first_row: r0.min(r1),
            first_col: c0.min(c1),
            last_row: r0.max(r1),
            last_col: c0.max(c1),
        })
    }

    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }
}

fn parse_cell(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.trim().replace('$', "");
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let col = letters
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b.to_ascii_uppercase() - b'A' + 1) as usize);
    let row = digits.parse::<usize>().ok().filter(|r| *r > 0)?;
    Some((row, col))
}

/// Font, fill and number format of one template cell.
///
/// Unset fields keep the workbook default (Calibri 11, no fill, General).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub font_name: Option<String>,
    pub font_size: Option<f64>,
    /// `0xRRGGBB`
    pub font_color: Option<u32>,
    /// `0xRRGGBB` of a solid fill.
    pub fill: Option<u32>,
    pub number_format: Option<String>,
}

impl CellStyle {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// Formatting of a worksheet apart from its values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetLayout {
    pub merges: Vec<CellRange>,
    /// Excel character widths by 1-based column.
    pub column_widths: BTreeMap<usize, f64>,
    /// Heights in points by 1-based row.
    pub row_heights: BTreeMap<usize, f64>,
    /// Styles that differ from the default, by 1-based `(row, col)`.
    pub styles: BTreeMap<(usize, usize), CellStyle>,
    pub landscape: bool,
}

impl SheetLayout {
    /// Layout of the first worksheet, empty when it cannot be read.
    #[cfg(feature = "xlsx")]
    pub fn capture(bytes: &[u8]) -> Self {
        Self::load(bytes).unwrap_or_else(|e| {
            log::warn!("template formatting not carried over: {e}");
            Self::default()
        })
    }

    /// Layout of the first worksheet, empty when it cannot be read.
    #[cfg(not(feature = "xlsx"))]
    pub fn capture(_bytes: &[u8]) -> Self {
        Self::default()
    }

    /// Styles of cells strictly above `row`.
    pub fn styles_above(&self, row: usize) -> impl Iterator<Item = ((usize, usize), &CellStyle)> {
        self.styles.range(..(row, 0)).map(|(k, v)| (*k, v))
    }
}

#[cfg(feature = "xlsx")]
mod read {
    use std::io::Cursor;

    use umya_spreadsheet::{OrientationValues, Style};

    use super::{CellRange, CellStyle, SheetLayout};
    use crate::core::{Input, SaldoError};

    const DEFAULT_FONT: &str = "Calibri";
    const DEFAULT_FONT_SIZE: f64 = 11.0;

    impl SheetLayout {
        /// Read the layout of the first worksheet of an xlsx buffer.
        pub fn load(bytes: &[u8]) -> Result<Self, SaldoError> {
            let book = umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true)
                .map_err(|e| SaldoError::Read(Input::Template, e.to_string()))?;
            let sheet = book
                .get_sheet(&0)
                .ok_or(SaldoError::EmptyWorkbook(Input::Template))?;

            let mut layout = SheetLayout {
                merges: sheet
                    .get_merge_cells()
                    .iter()
                    .filter_map(|range| CellRange::parse(&range.get_range()))
                    .filter(|range| !range.is_single_cell())
                    .collect(),
                landscape: matches!(
                    sheet.get_page_setup().get_orientation(),
                    OrientationValues::Landscape
                ),
                ..SheetLayout::default()
            };

            for column in sheet.get_column_dimensions() {
                let width = *column.get_width();
                if width > 0.0 {
                    layout
                        .column_widths
                        .insert(*column.get_col_num() as usize, width);
                }
            }
            for row in sheet.get_row_dimensions() {
                let height = *row.get_height();
                if height > 0.0 {
                    layout.row_heights.insert(*row.get_row_num() as usize, height);
                }
            }
            for cell in sheet.get_cell_collection() {
                let style = cell_style(cell.get_style());
                if !style.is_plain() {
                    let at = cell.get_coordinate();
                    layout
                        .styles
                        .insert((*at.get_row_num() as usize, *at.get_col_num() as usize), style);
                }
            }

            log::debug!(
                "template layout: {} merges, {} styled cells, {} column widths",
                layout.merges.len(),
                layout.styles.len(),
                layout.column_widths.len()
            );
            Ok(layout)
        }
    }

    fn cell_style(style: &Style) -> CellStyle {
        let mut out = CellStyle::default();
        if let Some(font) = style.get_font() {
            out.bold = *font.get_bold();
            out.italic = *font.get_italic();
            let name = font.get_name();
            if !name.is_empty() && name != DEFAULT_FONT {
                out.font_name = Some(name.to_string());
            }
            let size = *font.get_size();
            if size > 0.0 && size != DEFAULT_FONT_SIZE {
                out.font_size = Some(size);
            }
            out.font_color = rgb(font.get_color().get_argb()).filter(|c| *c != 0);
        }
        out.fill = style.get_background_color().and_then(|c| rgb(c.get_argb()));
        out.number_format = style
            .get_number_format()
            .map(|f| f.get_format_code().to_string())
            .filter(|code| !code.is_empty() && code != "General");
        out
    }

    /// `0xRRGGBB` of an `AARRGGBB` or `RRGGBB` string; theme colors have none.
    pub(super) fn rgb(argb: &str) -> Option<u32> {
        let hex = argb.get(argb.len().checked_sub(6)?..)?;
        u32::from_str_radix(hex, 16).ok()
    }
}
