//! Report pipeline: column resolution, row transfer, balances and invoice
//! numbers, checked on the generated sheet.

mod common;

use common::*;
use rust_decimal_macros::dec;
use saldo::core::*;
use saldo::report::{ISSUE_DATE_LABEL, Report};

fn generate(scenario: &Scenario) -> Report {
    Report::generate(&scenario.inputs(), &customer(), &ReportConfig::default()).unwrap()
}

// --- Scenario ---

#[test]
fn scenario_fills_the_region() {
    let report = generate(&Scenario::new());
    let g = report.grid();
    let c = *report.columns();

    assert_eq!(report.first_data_row(), 10);
    assert_eq!(report.last_data_row(), 11);
    assert_eq!(report.rows_written(), 2);

    assert_eq!(g.get(10, c.document_id).to_text(), "100");
    assert_eq!(g.get(10, c.document_type).to_text(), "Faktúra");
    assert_eq!(g.get(10, c.invoice_number).to_text(), "INV-100");
    assert_eq!(g.get(10, c.amount), &CellValue::Number(50.0));

    assert_eq!(g.get(11, c.document_id).to_text(), "101");
    assert_eq!(g.get(11, c.document_type).to_text(), "Dobropis");
    assert!(g.get(11, c.invoice_number).is_empty());
    assert_eq!(g.get(11, c.amount), &CellValue::Number(-20.0));

    assert_eq!(report.running_balances(), vec![dec!(50), dec!(30)]);
    assert_eq!(report.final_balance(), dec!(30));
}

#[test]
fn balance_column_chains_formulas() {
    let report = generate(&Scenario::new());
    let g = report.grid();
    let c = *report.columns();
    assert_eq!(g.get(10, c.balance), &CellValue::Formula("G10".into()));
    assert_eq!(g.get(11, c.balance), &CellValue::Formula("H10+G11".into()));
}

#[test]
fn due_date_only_on_invoices() {
    let report = generate(&Scenario::new());
    let g = report.grid();
    let c = *report.columns();
    assert_eq!(g.get(10, c.due_date).to_text(), "2024-02-05");
    assert!(g.get(11, c.due_date).is_empty());
    assert_eq!(g.get(11, c.issue_date).to_text(), "2024-01-05");
    assert_eq!(g.get(11, c.posting_date).to_text(), "2024-01-06");
}

#[test]
fn report_rows_flag_invoices() {
    let report = generate(&Scenario::new());
    let rows = report.rows();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_invoice);
    assert!(!rows[1].is_invoice);
    assert_eq!(rows[1].row, 11);
}

// --- Region lifecycle ---

#[test]
fn stale_rows_are_cleared() {
    let report = generate(&Scenario::new());
    let g = report.grid();
    assert_eq!(g.max_row(), 11);
    assert!(g.cells().all(|(_, _, v)| v.to_text() != "STALE"));
}

#[test]
fn blank_source_rows_are_skipped() {
    let scenario = Scenario::with_rows(vec![
        transaction("100", "Z1", 50.0),
        vec![],
        vec![Cell::Blank, Cell::Blank],
        transaction("101", "Z2", -20.0),
    ]);
    let report = generate(&scenario);
    assert_eq!(report.rows_written(), 2);
    let ids: Vec<String> = report.rows().iter().map(|r| r.document_id.to_text()).collect();
    assert_eq!(ids, vec!["100", "101"]);
    assert_eq!(report.final_balance(), dec!(30));
}

#[test]
fn source_order_is_kept() {
    let scenario = Scenario::with_rows(vec![
        transaction("300", "Z3", -5.0),
        transaction("100", "Z1", 10.0),
        transaction("200", "Z1", 2.5),
    ]);
    let report = generate(&scenario);
    let ids: Vec<String> = report.rows().iter().map(|r| r.document_id.to_text()).collect();
    assert_eq!(ids, vec!["300", "100", "200"]);
    assert_eq!(report.running_balances(), vec![dec!(-5), dec!(5), dec!(7.5)]);
}

#[test]
fn reruns_produce_the_same_sheet() {
    let scenario = Scenario::new();
    let first = generate(&scenario);
    let second = generate(&scenario);
    assert_eq!(first.grid(), second.grid());
}

#[test]
fn no_transactions_leave_an_empty_region() {
    let report = generate(&Scenario::with_rows(vec![]));
    assert_eq!(report.rows_written(), 0);
    assert!(report.rows().is_empty());
    assert_eq!(report.final_balance(), dec!(0));
    assert_eq!(report.grid().max_row(), 9);
}

// --- Lookup and join ---

#[test]
fn unknown_origin_leaves_type_and_due_date_empty() {
    let report = generate(&Scenario::with_rows(vec![transaction("100", "ZZ", 12.0)]));
    let g = report.grid();
    let c = *report.columns();
    assert!(g.get(10, c.document_type).is_empty());
    assert!(g.get(10, c.due_date).is_empty());
    assert!(g.get(10, c.invoice_number).is_empty());
    assert_eq!(report.final_balance(), dec!(12));
}

#[test]
fn invoices_without_reference_stay_blank() {
    let report = generate(&Scenario::with_rows(vec![transaction("555", "Z1", 1.0)]));
    let c = *report.columns();
    assert!(report.grid().get(10, c.invoice_number).is_empty());
}

#[test]
fn reference_prefix_is_case_insensitive() {
    let mut scenario = Scenario::new();
    scenario.references = references(&[("100", "  vbrk 42-A ")]);
    let report = generate(&scenario);
    let c = *report.columns();
    assert_eq!(report.grid().get(10, c.invoice_number).to_text(), "42-A");
}

// --- Template header ---

#[test]
fn legacy_issue_date_header_is_renamed() {
    let report = generate(&Scenario::new());
    let c = *report.columns();
    assert_eq!(report.grid().get(9, c.issue_date).to_text(), ISSUE_DATE_LABEL);
}

#[test]
fn headers_resolve_without_diacritics_or_case() {
    let mut scenario = Scenario::new();
    scenario.template = template_with_headers(&[
        "CISLO DOKLADU",
        "cislo faktury",
        "datum zadania",
        "Datum uctovania",
        "splatnost  netto",
        "typ dokladu",
        "\u{a0}ciastka ",
        "ZOSTATOK",
    ]);
    let report = generate(&scenario);
    assert_eq!(report.columns().balance, 8);
    assert_eq!(report.final_balance(), dec!(30));
}

#[test]
fn customer_block_is_stamped() {
    let report = generate(&Scenario::new());
    let g = report.grid();
    assert_eq!(g.get(1, 2).to_text(), "1000123");
    assert_eq!(g.get(2, 2).to_text(), "Ján Novák");
    assert_eq!(g.get(3, 2).to_text(), "SWAN a.s.");
    assert_eq!(g.get(4, 2).to_text(), "500012345");
    assert_eq!(g.get(1, 1).to_text(), "SAP ID:");
}

// --- Errors ---

#[test]
fn missing_balance_column_fails() {
    let mut scenario = Scenario::new();
    scenario.template = template_with_headers(&TEMPLATE_HEADERS[..7]);
    let err = Report::generate(&scenario.inputs(), &customer(), &ReportConfig::default()).unwrap_err();
    assert!(matches!(&err, SaldoError::MissingColumns(cols) if cols == &["Zostatok"]));
    insta::assert_snapshot!(err.to_string(), @"template is missing required columns: Zostatok");
}

#[test]
fn every_missing_column_is_listed() {
    let mut scenario = Scenario::new();
    scenario.template = template_with_headers(&["Číslo dokladu", "Typ dokladu", "Čiastka"]);
    let err = Report::generate(&scenario.inputs(), &customer(), &ReportConfig::default()).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"template is missing required columns: Číslo Faktúry/číslo Faktúry, Dátum vystavenia / Pripísania platby / Dátum zadania, Dátum účtovania, Splatnosť netto, Zostatok"
    );
}

#[test]
fn helper_without_type_column_fails() {
    let mut scenario = Scenario::new();
    scenario.helper = workbook(&[vec![t("Označenie pôvodu"), t("Typ")], vec![t("Z1"), t("Faktúra")]]);
    let err = Report::generate(&scenario.inputs(), &customer(), &ReportConfig::default()).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"helper workbook is missing columns: 'Typ dokladu'");
}

#[test]
fn references_without_columns_fail() {
    let mut scenario = Scenario::new();
    scenario.references = workbook(&[vec![t("Doklad"), t("Referencia")]]);
    let err = Report::generate(&scenario.inputs(), &customer(), &ReportConfig::default()).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"references workbook is missing columns: 'Číslo dokladu', 'Doplnková referencia'"
    );
}

#[test]
fn garbage_input_is_a_read_error() {
    let mut scenario = Scenario::new();
    scenario.transactions = b"not a spreadsheet".to_vec();
    let err = Report::generate(&scenario.inputs(), &customer(), &ReportConfig::default()).unwrap_err();
    assert!(matches!(err, SaldoError::Read(Input::Transactions, _)));
}

// --- Configuration ---

#[test]
fn custom_header_row_and_invoice_type() {
    let template = workbook(&[
        vec![t("SAP ID:")],
        vec![t("Meno:")],
        vec![t("Spoločnosť:")],
        vec![t("Zmluvný účet:")],
        TEMPLATE_HEADERS.iter().map(|h| t(h)).collect(),
    ]);
    let mut scenario = Scenario::new();
    scenario.template = template;
    let config = ReportConfigBuilder::new()
        .header_row(5)
        .invoice_type("Dobropis")
        .build();
    let report = Report::generate(&scenario.inputs(), &customer(), &config).unwrap();
    let c = *report.columns();
    let g = report.grid();
    assert_eq!(report.first_data_row(), 6);
    assert!(g.get(6, c.invoice_number).is_empty());
    assert_eq!(g.get(7, c.invoice_number).to_text(), "CN-101");
    assert_eq!(g.get(7, c.due_date).to_text(), "2024-02-05");
}
