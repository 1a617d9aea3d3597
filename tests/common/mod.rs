//! In-memory workbook fixtures shared by the integration tests.

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use saldo::core::{CustomerFields, CustomerFieldsBuilder, Inputs};

/// A fixture cell.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

pub fn t(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

pub fn n(x: f64) -> Cell {
    Cell::Number(x)
}

/// Write rows (starting at A1) into the first sheet of a new workbook.
pub fn workbook(rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r, c, s).unwrap();
                }
                Cell::Number(x) => {
                    sheet.write_number(r, c, *x).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

pub const TEMPLATE_HEADERS: [&str; 8] = [
    "Číslo dokladu",
    "číslo Faktúry",
    "Dátum zadania",
    "Dátum účtovania",
    "Splatnosť netto",
    "Typ dokladu",
    "Čiastka",
    "Zostatok",
];

/// Template with the customer labels in A1:A4, the given header in row 9 and
/// a stale data row in row 10.
pub fn template_with_headers(headers: &[&str]) -> Vec<u8> {
    let mut rows: Vec<Vec<Cell>> = vec![
        vec![t("SAP ID:")],
        vec![t("Meno:")],
        vec![t("Spoločnosť:")],
        vec![t("Zmluvný účet:")],
        vec![],
        vec![],
        vec![],
        vec![],
        headers.iter().map(|h| t(h)).collect(),
    ];
    rows.push(vec![
        t("STALE"),
        t("OLD-1"),
        Cell::Blank,
        Cell::Blank,
        Cell::Blank,
        t("Faktúra"),
        n(999.0),
        n(999.0),
    ]);
    workbook(&rows)
}

pub fn template() -> Vec<u8> {
    template_with_headers(&TEMPLATE_HEADERS)
}

pub fn helper() -> Vec<u8> {
    workbook(&[
        vec![t("Označenie pôvodu"), t("Typ dokladu")],
        vec![t("Z1"), t("Faktúra")],
        vec![t("Z2"), t("Dobropis")],
        vec![t("Z3"), t("Platba")],
    ])
}

pub const SOURCE_HEADERS: [&str; 6] = [
    "Číslo dokladu",
    "Dátum zadania",
    "Dátum účtovania",
    "Splatnosť netto",
    "Označenie pôvodu",
    "Čiastka",
];

/// One transaction row: id, origin code, amount.
pub fn transaction(id: &str, origin: &str, amount: f64) -> Vec<Cell> {
    vec![
        t(id),
        t("2024-01-05"),
        t("2024-01-06"),
        t("2024-02-05"),
        t(origin),
        n(amount),
    ]
}

pub fn transactions(rows: Vec<Vec<Cell>>) -> Vec<u8> {
    let mut all = vec![SOURCE_HEADERS.iter().map(|h| t(h)).collect::<Vec<_>>()];
    all.extend(rows);
    workbook(&all)
}

pub fn references(pairs: &[(&str, &str)]) -> Vec<u8> {
    let mut rows = vec![vec![t("Číslo dokladu"), t("Doplnková referencia")]];
    rows.extend(pairs.iter().map(|(id, r)| vec![t(id), t(r)]));
    workbook(&rows)
}

pub fn customer() -> CustomerFields {
    CustomerFieldsBuilder::new("Ján Novák", "1000123", "500012345").build()
}

/// Owned buffers of the scenario: a Faktúra of 50.00 and a Dobropis of -20.00.
pub struct Scenario {
    pub template: Vec<u8>,
    pub helper: Vec<u8>,
    pub transactions: Vec<u8>,
    pub references: Vec<u8>,
}

impl Scenario {
    pub fn new() -> Self {
        Self::with_rows(vec![
            transaction("100", "Z1", 50.0),
            transaction("101", "Z2", -20.0),
        ])
    }

    pub fn with_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self {
            template: template(),
            helper: helper(),
            transactions: transactions(rows),
            references: references(&[("100", "VBRKINV-100"), ("101", "VBRKCN-101")]),
        }
    }

    pub fn inputs(&self) -> Inputs<'_> {
        Inputs::new(&self.template, &self.helper, &self.transactions, &self.references)
    }
}
