//! Document output: the report as a paginated A4 PDF.
//!
//! The table shows the eight report columns under short labels, with
//! right-aligned money, centred dates and a closing total row. Running
//! balances are recomputed from the amount column; balance cells of the sheet
//! are never read. The column header repeats on every page and each page
//! carries a `Strana n / N` footer.
//!
//! Text is set in the base-14 Helvetica pair (see [`register_fonts`]), so no
//! font files are embedded.

mod canvas;
mod font;
mod format;
mod layout;
mod logo;

pub use font::register_fonts;
pub use format::{check_date_format, date_cell, format_money, money_cell};
pub use logo::Logo;

use chrono::{Local, NaiveDate};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

use crate::core::{CustomerFields, Palette, RenderOptions, SaldoError};
use crate::report::{Report, SemanticColumn};

use canvas::Canvas;
use font::{Face, font_dictionary, text_width};
use layout::{
    Align, BODY_TEXT, CELL_PAD_X, CONTENT_WIDTH, HEADER_TEXT, MARGIN_BOTTOM, MARGIN_SIDE,
    MARGIN_TOP, MM, PAGE_HEIGHT, PAGE_WIDTH, TOTAL_TEXT, TextStyle, column_widths, paginate,
    row_height, wrap,
};

const COLUMNS: usize = 8;
const LOGO_NAME: &str = "Im1";
const LOGO_SIDE: f32 = 16.0 * MM;
const LOGO_GAP: f32 = 4.0 * MM;

const TITLE_SIZE: f32 = 16.0;
const TITLE_LEADING: f32 = 18.0;
const META_SIZE: f32 = 9.0;
const META_LEADING: f32 = 12.0;
const HEADER_BLOCK_GAP: f32 = 8.0;
const GRID_LINE: f32 = 0.35;
const FOOTER_SIZE: f32 = 7.5;

const TEXT_COLOR: u32 = 0x0F172A;
const HEADER_TEXT_COLOR: u32 = 0xFFFFFF;
const FOOTER_COLOR: u32 = 0x64748B;

const TOTAL_LABEL: &str = "Súčet";

/// Render a report as a PDF document.
pub fn to_pdf(report: &Report, options: &RenderOptions) -> Result<Vec<u8>, SaldoError> {
    register_fonts();
    let config = report.config();
    check_date_format(&config.document_date_format)?;
    let generated_on = options
        .generated_on
        .unwrap_or_else(|| Local::now().date_naive());
    let logo = options.logo.as_deref().map(Logo::decode).transpose()?;

    let table = Table::build(report, &config.document_date_format);
    let header = HeaderBlock::new(
        &config.title,
        report.customer(),
        &generated_on,
        &config.document_date_format,
        logo.as_ref().map(|l| l.fit(LOGO_SIDE)),
    );
    let pages = paginate(
        header.height,
        table.header.height,
        &table.rows.iter().map(|r| r.height).collect::<Vec<_>>(),
        table.total.height,
    );
    log::debug!("document layout: {} rows on {} pages", table.rows.len(), pages.len());

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for face in [Face::Regular, Face::Bold] {
        fonts.set(face.resource_name(), doc.add_object(font_dictionary(face)));
    }
    let mut resources = dictionary! { "Font" => fonts };
    if let Some(logo) = &logo {
        let mut xobjects = Dictionary::new();
        xobjects.set(LOGO_NAME, logo.embed(&mut doc));
        resources.set("XObject", xobjects);
    }
    let resources_id = doc.add_object(resources);

    let palette = options.theme.palette();
    let page_count = pages.len();
    let mut kids = Vec::with_capacity(page_count);
    for (index, slice) in pages.iter().enumerate() {
        let mut canvas = Canvas::new();
        if index == 0 {
            header.draw(&mut canvas);
        }
        let mut top = MARGIN_TOP + if index == 0 { header.height } else { 0.0 };

        table.draw_row(&mut canvas, &table.header, top, Some(palette.header), HEADER_TEXT_COLOR, palette);
        top += table.header.height;
        for i in slice.rows.clone() {
            let fill = (i % 2 == 1).then_some(palette.stripe);
            table.draw_row(&mut canvas, &table.rows[i], top, fill, TEXT_COLOR, palette);
            top += table.rows[i].height;
        }
        if slice.total {
            table.draw_row(&mut canvas, &table.total, top, Some(palette.header), HEADER_TEXT_COLOR, palette);
        }
        draw_footer(&mut canvas, index + 1, page_count);

        let content = canvas
            .finish()
            .encode()
            .map_err(|e| SaldoError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(&config.title),
        "Producer" => Object::string_literal("saldo"),
    });
    doc.trailer.set("Info", info_id);

    doc.compress();
    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| SaldoError::Pdf(e.to_string()))?;
    Ok(out)
}

/// PDF text string in UTF-16BE with a byte-order mark.
fn text_string(s: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn draw_footer(canvas: &mut Canvas, page: usize, pages: usize) {
    let text = format!("Strana {page} / {pages}");
    let width = text_width(&text, Face::Regular, FOOTER_SIZE);
    let baseline = PAGE_HEIGHT - MARGIN_BOTTOM / 2.0;
    canvas.text(
        (PAGE_WIDTH - width) / 2.0,
        baseline,
        Face::Regular,
        FOOTER_SIZE,
        FOOTER_COLOR,
        &text,
    );
}

/// Baseline of the first of `lines` lines vertically centred in a box.
fn first_baseline(top: f32, height: f32, lines: usize, style: TextStyle) -> f32 {
    let block = lines as f32 * style.leading;
    top + (height - block) / 2.0 + (style.leading - style.size) / 2.0 + style.size * 0.8
}

fn alignment(column: SemanticColumn) -> Align {
    if column.is_money() {
        Align::Right
    } else if column.is_date() {
        Align::Center
    } else {
        Align::Left
    }
}

/// A table row with its cells already wrapped.
struct LaidRow {
    cells: [Vec<String>; COLUMNS],
    aligns: [Align; COLUMNS],
    style: TextStyle,
    height: f32,
}

impl LaidRow {
    fn new(texts: &[String; COLUMNS], aligns: [Align; COLUMNS], style: TextStyle, widths: &[f32; COLUMNS]) -> Self {
        let cells: [Vec<String>; COLUMNS] = std::array::from_fn(|col| {
            wrap(&texts[col], style.face, style.size, widths[col] - 2.0 * CELL_PAD_X)
        });
        let lines = cells.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            cells,
            aligns,
            style,
            height: row_height(lines, style),
        }
    }
}

struct Table {
    widths: [f32; COLUMNS],
    header: LaidRow,
    rows: Vec<LaidRow>,
    total: LaidRow,
}

impl Table {
    fn build(report: &Report, date_format: &str) -> Self {
        let balances = report.running_balances();
        let texts: Vec<[String; COLUMNS]> = report
            .rows()
            .iter()
            .zip(&balances)
            .map(|(row, balance)| {
                SemanticColumn::ALL.map(|column| match column {
                    SemanticColumn::DocumentId => row.document_id.to_text().trim().to_string(),
                    SemanticColumn::InvoiceNumber if row.is_invoice => {
                        row.invoice_number.to_text().trim().to_string()
                    }
                    SemanticColumn::InvoiceNumber => String::new(),
                    SemanticColumn::IssueDate => date_cell(row.issue_date, date_format),
                    SemanticColumn::PostingDate => date_cell(row.posting_date, date_format),
                    SemanticColumn::DueDate if row.is_invoice => date_cell(row.due_date, date_format),
                    SemanticColumn::DueDate => String::new(),
                    SemanticColumn::DocumentType => row.document_type.to_text().trim().to_string(),
                    SemanticColumn::Amount => money_cell(row.amount),
                    SemanticColumn::Balance => format_money(*balance),
                })
            })
            .collect();

        let labels = SemanticColumn::ALL.map(SemanticColumn::document_label);
        let balance_index = SemanticColumn::ALL
            .iter()
            .position(|c| *c == SemanticColumn::Balance)
            .unwrap_or(COLUMNS - 1);
        let widths = column_widths(&labels, &texts, balance_index, CONTENT_WIDTH);

        let body_aligns = SemanticColumn::ALL.map(alignment);
        let header = LaidRow::new(
            &labels.map(str::to_string),
            [Align::Center; COLUMNS],
            HEADER_TEXT,
            &widths,
        );
        let rows = texts
            .iter()
            .map(|t| LaidRow::new(t, body_aligns, BODY_TEXT, &widths))
            .collect();

        let final_balance = balances.last().copied().unwrap_or_default();
        let total_texts = SemanticColumn::ALL.map(|column| match column {
            SemanticColumn::Amount => TOTAL_LABEL.to_string(),
            SemanticColumn::Balance => format_money(final_balance),
            _ => String::new(),
        });
        let total = LaidRow::new(&total_texts, [Align::Right; COLUMNS], TOTAL_TEXT, &widths);

        Self {
            widths,
            header,
            rows,
            total,
        }
    }

    fn draw_row(
        &self,
        canvas: &mut Canvas,
        row: &LaidRow,
        top: f32,
        fill: Option<u32>,
        text_color: u32,
        palette: Palette,
    ) {
        if let Some(fill) = fill {
            canvas.fill_rect(MARGIN_SIDE, top, CONTENT_WIDTH, row.height, fill);
        }
        let style = row.style;
        let mut x = MARGIN_SIDE;
        for col in 0..COLUMNS {
            let width = self.widths[col];
            canvas.stroke_rect(x, top, width, row.height, palette.grid, GRID_LINE);
            let lines = &row.cells[col];
            let mut baseline = first_baseline(top, row.height, lines.len(), style);
            for line in lines {
                let line_width = text_width(line, style.face, style.size);
                let lx = match row.aligns[col] {
                    Align::Left => x + CELL_PAD_X,
                    Align::Center => x + (width - line_width) / 2.0,
                    Align::Right => x + width - CELL_PAD_X - line_width,
                };
                canvas.text(lx, baseline, style.face, style.size, text_color, line);
                baseline += style.leading;
            }
            x += width;
        }
    }
}

/// A run of text in one face.
type Run = (Face, String);

/// Logo, title, generation date and customer line on top of the first page.
struct HeaderBlock {
    logo: Option<(f32, f32)>,
    text_x: f32,
    title: Vec<String>,
    date_line: Vec<Run>,
    meta_lines: Vec<Vec<Run>>,
    height: f32,
}

impl HeaderBlock {
    fn new(
        title: &str,
        customer: &CustomerFields,
        generated_on: &NaiveDate,
        date_format: &str,
        logo: Option<(f32, f32)>,
    ) -> Self {
        let text_x = MARGIN_SIDE + logo.map_or(0.0, |_| LOGO_SIDE + LOGO_GAP);
        let text_width_max = PAGE_WIDTH - MARGIN_SIDE - text_x;

        let title = wrap(title, Face::Bold, TITLE_SIZE, text_width_max);
        let date_line = vec![
            (Face::Regular, "Dátum generovania: ".to_string()),
            (Face::Bold, generated_on.format(date_format).to_string()),
        ];
        let segments = vec![
            vec![(Face::Regular, format!("{} — ", customer.company_name))],
            vec![
                (Face::Bold, "Meno: ".to_string()),
                (Face::Regular, customer.name.clone()),
            ],
            vec![
                (Face::Regular, " • ".to_string()),
                (Face::Bold, "SAP ID: ".to_string()),
                (Face::Regular, customer.sap_id.clone()),
            ],
            vec![
                (Face::Regular, " • ".to_string()),
                (Face::Bold, "Zmluvný účet: ".to_string()),
                (Face::Regular, customer.contract_account.clone()),
            ],
        ];
        let meta_lines = flow_segments(segments, text_width_max);

        let text_height = title.len().max(1) as f32 * TITLE_LEADING
            + META_LEADING * (1 + meta_lines.len()) as f32;
        let logo_height = logo.map_or(0.0, |(_, h)| h);
        Self {
            logo,
            text_x,
            title,
            date_line,
            meta_lines,
            height: text_height.max(logo_height) + HEADER_BLOCK_GAP,
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        if let Some((width, height)) = self.logo {
            canvas.image(LOGO_NAME, MARGIN_SIDE, MARGIN_TOP, width, height);
        }
        let mut baseline = MARGIN_TOP + TITLE_SIZE * 0.8;
        for line in &self.title {
            canvas.text(self.text_x, baseline, Face::Bold, TITLE_SIZE, TEXT_COLOR, line);
            baseline += TITLE_LEADING;
        }
        baseline += META_LEADING - TITLE_LEADING + META_SIZE * 0.2;
        for runs in std::iter::once(&self.date_line).chain(&self.meta_lines) {
            let mut x = self.text_x;
            for (face, text) in runs {
                canvas.text(x, baseline, *face, META_SIZE, TEXT_COLOR, text);
                x += text_width(text, *face, META_SIZE);
            }
            baseline += META_LEADING;
        }
    }
}

/// Lay segments of runs onto lines, breaking only between segments.
fn flow_segments(segments: Vec<Vec<Run>>, max_width: f32) -> Vec<Vec<Run>> {
    let mut lines: Vec<Vec<Run>> = Vec::new();
    let mut line: Vec<Run> = Vec::new();
    let mut used = 0.0;
    for segment in segments {
        let width: f32 = segment
            .iter()
            .map(|(face, text)| text_width(text, *face, META_SIZE))
            .sum();
        if !line.is_empty() && used + width > max_width {
            lines.push(std::mem::take(&mut line));
            used = 0.0;
        }
        used += width;
        line.extend(segment);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_text(runs: &[Run]) -> String {
        runs.iter().map(|(_, t)| t.as_str()).collect()
    }

    #[test]
    fn meta_line_reads_in_order() {
        let customer = CustomerFields {
            name: "Ján Novák".into(),
            sap_id: "1000123".into(),
            contract_account: "500012345".into(),
            company_name: "SWAN a.s.".into(),
        };
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let block = HeaderBlock::new("Saldo", &customer, &date, "%d.%m.%Y", None);
        assert_eq!(run_text(&block.date_line), "Dátum generovania: 06.05.2024");
        let meta: String = block.meta_lines.iter().map(|l| run_text(l)).collect();
        assert_eq!(
            meta,
            "SWAN a.s. — Meno: Ján Novák • SAP ID: 1000123 • Zmluvný účet: 500012345"
        );
        assert_eq!(block.meta_lines.len(), 1);
    }

    #[test]
    fn narrow_meta_lines_break_between_segments() {
        let segments = vec![
            vec![(Face::Regular, "aaaa".to_string())],
            vec![(Face::Regular, "bbbb".to_string())],
        ];
        let width = text_width("aaaa", Face::Regular, META_SIZE) + 1.0;
        let lines = flow_segments(segments, width);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn logo_shifts_the_text_column() {
        let customer = CustomerFields::default();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let plain = HeaderBlock::new("T", &customer, &date, "%d.%m.%Y", None);
        let with_logo = HeaderBlock::new("T", &customer, &date, "%d.%m.%Y", Some((LOGO_SIDE, LOGO_SIDE)));
        assert!(with_logo.text_x > plain.text_x);
        assert!(with_logo.height >= LOGO_SIDE);
    }

    #[test]
    fn text_strings_are_utf16_with_bom() {
        match text_string("č") {
            Object::String(bytes, _) => assert_eq!(bytes, vec![0xFE, 0xFF, 0x01, 0x0D]),
            _ => panic!("expected a string"),
        }
    }
}
