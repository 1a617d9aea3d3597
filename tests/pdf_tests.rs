//! Document output, inspected with lopdf.

#![cfg(feature = "pdf")]

mod common;

use std::io::Cursor;

use chrono::NaiveDate;
use common::*;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use lopdf::content::Content;
use lopdf::{Document, Object};
use rust_decimal::Decimal;
use saldo::core::*;

fn options() -> RenderOptions {
    RenderOptionsBuilder::new(OutputFormat::Document)
        .generated_on(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap())
        .build()
}

fn render_document(scenario: &Scenario, options: &RenderOptions) -> Document {
    let bytes = saldo::render(&scenario.inputs(), &customer(), options).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.5"));
    Document::load_mem(&bytes).unwrap()
}

/// Every `Tj` operand of every page, in page order.
fn page_texts(doc: &Document) -> Vec<Vec<Vec<u8>>> {
    doc.get_pages()
        .values()
        .map(|&page| {
            let content = Content::decode(&doc.get_page_content(page).unwrap()).unwrap();
            content
                .operations
                .into_iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => Some(bytes.clone()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

fn contains(texts: &[Vec<u8>], needle: &[u8]) -> bool {
    texts.iter().any(|t| t.windows(needle.len()).any(|w| w == needle))
}

/// The money text of a `Tj` operand without its currency sign, if it is one.
///
/// The non-breaking space is set as a plain space and the euro sign as an
/// upper-half code, so the figure is the ASCII prefix.
fn money_figure(text: &[u8]) -> Option<String> {
    let end = text.iter().position(|b| !b.is_ascii()).unwrap_or(text.len());
    let (figure, currency) = text.split_at(end);
    let figure = std::str::from_utf8(figure).ok()?.trim_end();
    let (units, cents) = figure.split_once(',')?;
    let units = units.strip_prefix('-').unwrap_or(units);
    let is_money = !currency.is_empty()
        && !units.is_empty()
        && units.bytes().all(|b| b.is_ascii_digit() || b == b' ')
        && cents.len() == 2
        && cents.bytes().all(|b| b.is_ascii_digit());
    is_money.then(|| figure.to_string())
}

fn logo_png(alpha: u8) -> Vec<u8> {
    let img = RgbaImage::from_pixel(8, 4, Rgba([37, 179, 173, alpha]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn short_report_fits_one_page() {
    let doc = render_document(&Scenario::new(), &options());
    assert_eq!(doc.get_pages().len(), 1);
    let texts = page_texts(&doc);
    assert!(contains(&texts[0], b"Strana 1 / 1"));
}

#[test]
fn table_shows_rows_and_total() {
    let doc = render_document(&Scenario::new(), &options());
    let texts = &page_texts(&doc)[0];
    assert!(contains(texts, b"INV-100"));
    assert!(contains(texts, b"101"));
    assert!(contains(texts, b"50,00"));
    assert!(contains(texts, b"-20,00"));
    assert!(contains(texts, b"30,00"));
    assert!(contains(texts, b"05.01.2024"));
    assert!(contains(texts, b"06.05.2024"));
    assert!(contains(texts, b"SAP ID: "));
    assert!(contains(texts, b"1000123"));
}

#[test]
fn credit_notes_never_show_a_reference() {
    let doc = render_document(&Scenario::new(), &options());
    let texts = &page_texts(&doc)[0];
    assert!(!contains(texts, b"CN-101"));
}

#[test]
fn long_reports_paginate_with_repeated_footer() {
    let rows = (0..200)
        .map(|i| transaction(&format!("{}", 1000 + i), if i % 3 == 0 { "Z1" } else { "Z2" }, 10.0))
        .collect();
    let doc = render_document(&Scenario::with_rows(rows), &options());
    let pages = page_texts(&doc);
    let count = pages.len();
    assert!(count > 1);
    for (i, texts) in pages.iter().enumerate() {
        let footer = format!("Strana {} / {count}", i + 1);
        assert!(contains(texts, footer.as_bytes()), "page {}", i + 1);
        assert!(contains(texts, b"Zostatok"), "header repeats on page {}", i + 1);
    }
    // 200 rows of 10.00
    assert!(contains(&pages[count - 1], b"2 000,00"));
    assert!(contains(&pages[0], b"1000"));
    assert!(contains(&pages[count - 1], b"1199"));
}

#[test]
fn fixed_generation_date_is_reproducible() {
    let scenario = Scenario::new();
    let first = saldo::render(&scenario.inputs(), &customer(), &options()).unwrap();
    let second = saldo::render(&scenario.inputs(), &customer(), &options()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn logo_is_embedded_with_soft_mask() {
    let mut options = options();
    options.logo = Some(logo_png(128));
    let doc = render_document(&Scenario::new(), &options);
    let images: Vec<_> = doc
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .is_ok_and(|n| n == b"Image")
        })
        .collect();
    assert_eq!(images.len(), 2);
    assert!(images.iter().any(|s| s.dict.has(b"SMask")));
}

#[test]
fn opaque_logo_has_no_mask() {
    let mut options = options();
    options.logo = Some(logo_png(255));
    let doc = render_document(&Scenario::new(), &options);
    let masks = doc
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| s.dict.has(b"SMask"))
        .count();
    assert_eq!(masks, 0);
}

#[test]
fn undecodable_logo_is_rejected() {
    let mut options = options();
    options.logo = Some(b"GIF89a-but-not-really".to_vec());
    let err = saldo::render(&Scenario::new().inputs(), &customer(), &options).unwrap_err();
    assert!(matches!(err, SaldoError::Logo(_)));
}

#[test]
fn empty_report_still_renders_a_total() {
    let doc = render_document(&Scenario::with_rows(vec![]), &options());
    let texts = &page_texts(&doc)[0];
    assert!(contains(texts, b"0,00"));
    assert!(contains(texts, b"Strana 1 / 1"));
}

#[cfg(feature = "xlsx")]
#[test]
fn finished_workbook_renders_as_document() {
    let scenario = Scenario::new();
    let workbook = saldo::render(
        &scenario.inputs(),
        &customer(),
        &RenderOptionsBuilder::new(OutputFormat::Workbook).build(),
    )
    .unwrap();
    let report = saldo::report::Report::from_workbook(&workbook, &ReportConfig::default()).unwrap();
    let bytes = saldo::pdf::to_pdf(&report, &options()).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let texts = &page_texts(&doc)[0];
    assert!(contains(texts, b"INV-100"));
    assert!(contains(texts, b"30,00"));
}

#[test]
fn unusable_date_format_is_an_error() {
    for format in ["%d.%m.%Q", "%H:%M"] {
        let options = RenderOptionsBuilder::new(OutputFormat::Document)
            .config(ReportConfigBuilder::new().document_date_format(format).build())
            .build();
        let err = saldo::render(&Scenario::new().inputs(), &customer(), &options).unwrap_err();
        assert!(matches!(err, SaldoError::InvalidOption(_)), "{format}: {err}");
    }
}

#[cfg(feature = "xlsx")]
#[test]
fn row_balances_agree_between_formats() {
    const ROWS: i64 = 50;
    let cents: Vec<i64> = (1..=ROWS)
        .map(|k| if k % 4 == 0 { -125 * k } else { 125 * k })
        .collect();
    let rows = cents
        .iter()
        .enumerate()
        .map(|(i, c)| transaction(&format!("D{i:03}"), ["Z1", "Z2", "Z3"][i % 3], *c as f64 / 100.0))
        .collect();
    let scenario = Scenario::with_rows(rows);
    let expected: Vec<String> = cents
        .iter()
        .scan(Decimal::ZERO, |balance, c| {
            *balance += Decimal::new(*c, 2);
            Some(saldo::pdf::format_money(*balance))
        })
        .collect();

    let workbook = saldo::render(
        &scenario.inputs(),
        &customer(),
        &RenderOptionsBuilder::new(OutputFormat::Workbook).build(),
    )
    .unwrap();
    let grid = saldo::sheet::Grid::load(&workbook, Input::Report).unwrap();
    let cached: Vec<String> = (10..10 + ROWS as usize)
        .map(|row| saldo::pdf::money_cell(grid.get(row, 8)))
        .collect();
    assert_eq!(cached, expected);

    // amount and balance of every row, then the total
    let doc = render_document(&scenario, &options());
    let figures: Vec<String> = page_texts(&doc)
        .concat()
        .iter()
        .filter_map(|t| money_figure(t))
        .collect();
    assert_eq!(figures.len(), 2 * ROWS as usize + 1);
    let expected: Vec<&str> = expected
        .iter()
        .map(|m| m.trim_end_matches("\u{a0}€"))
        .collect();
    let balances: Vec<&str> = figures.iter().skip(1).step_by(2).map(String::as_str).collect();
    assert_eq!(balances, expected);
    assert_eq!(figures.last().map(String::as_str), expected.last().copied());
}

#[test]
fn money_formatting_is_public() {
    assert_eq!(
        saldo::pdf::format_money(rust_decimal_macros::dec!(-1234.5)),
        "-1 234,50\u{a0}€"
    );
}
