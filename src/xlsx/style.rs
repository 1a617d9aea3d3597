use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

use crate::core::{Palette, ReportConfig};
use crate::report::SemanticColumn;
use crate::sheet::CellStyle;

/// What a data cell holds, for picking its number format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellKind {
    Text,
    Date,
    Money,
}

impl CellKind {
    pub(crate) fn of(column: Option<SemanticColumn>) -> Self {
        match column {
            Some(c) if c.is_money() => CellKind::Money,
            Some(c) if c.is_date() => CellKind::Date,
            _ => CellKind::Text,
        }
    }
}

/// Reusable formats of one themed workbook.
pub(crate) struct Styles {
    pub header: Format,
    pub total: Format,
    pub total_label: Format,
    pub date: Format,
    pub plain: Format,
    body: [Format; 3],
    striped: [Format; 3],
}

impl Styles {
    pub(crate) fn new(palette: Palette, config: &ReportConfig) -> Self {
        let grid = Color::RGB(palette.grid);

        let header = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(palette.header))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(grid);

        let cell = |kind: CellKind, stripe: bool| {
            let mut format = Format::new()
                .set_border(FormatBorder::Thin)
                .set_border_color(grid);
            if stripe {
                format = format.set_background_color(Color::RGB(palette.stripe));
            }
            match kind {
                CellKind::Text => format,
                CellKind::Date => format
                    .set_num_format(&config.date_format)
                    .set_align(FormatAlign::Center),
                CellKind::Money => format.set_num_format(&config.amount_format),
            }
        };
        let kinds = [CellKind::Text, CellKind::Date, CellKind::Money];

        Self {
            header,
            total: Format::new().set_bold().set_num_format(&config.total_format),
            total_label: Format::new().set_bold().set_align(FormatAlign::Right),
            date: Format::new().set_num_format(&config.date_format),
            plain: Format::new(),
            body: kinds.map(|k| cell(k, false)),
            striped: kinds.map(|k| cell(k, true)),
        }
    }

    /// Bordered data-cell format, striped or plain.
    pub(crate) fn body(&self, kind: CellKind, stripe: bool) -> &Format {
        let set = if stripe { &self.striped } else { &self.body };
        &set[kind as usize]
    }
}

/// Format of a template cell kept outside the report region.
///
/// `fallback_num_format` applies when the template sets none, so date
/// serials still read as dates.
pub(crate) fn template_format(style: &CellStyle, fallback_num_format: Option<&str>) -> Format {
    let mut format = Format::new();
    if style.bold {
        format = format.set_bold();
    }
    if style.italic {
        format = format.set_italic();
    }
    if let Some(name) = &style.font_name {
        format = format.set_font_name(name);
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if let Some(rgb) = style.font_color {
        format = format.set_font_color(Color::RGB(rgb));
    }
    if let Some(rgb) = style.fill {
        format = format.set_background_color(Color::RGB(rgb));
    }
    if let Some(code) = style.number_format.as_deref().or(fallback_num_format) {
        format = format.set_num_format(code);
    }
    format
}

/// Pixel width of a stored Excel column width (Calibri 11).
pub(crate) fn width_pixels(width: f64) -> u16 {
    const DIGIT: f64 = 7.0;
    let pixels = if width < 1.0 {
        (width * 12.0).round()
    } else {
        ((256.0 * width + (128.0 / DIGIT).trunc()) / 256.0 * DIGIT).trunc()
    };
    pixels.clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Fixed column width (in characters) of a report column.
pub(crate) fn column_width(column: SemanticColumn) -> f64 {
    match column {
        SemanticColumn::DocumentId => 16.0,
        SemanticColumn::InvoiceNumber => 18.0,
        SemanticColumn::IssueDate => 18.0,
        SemanticColumn::PostingDate => 16.0,
        SemanticColumn::DueDate => 16.0,
        SemanticColumn::DocumentType => 22.0,
        SemanticColumn::Amount => 14.0,
        SemanticColumn::Balance => 14.0,
    }
}
