#![no_main]

use libfuzzer_sys::fuzz_target;
use saldo::core::{RenderOptions, ReportConfig};
use saldo::report::Report;

fuzz_target!(|data: &[u8]| {
    if let Ok(report) = Report::from_workbook(data, &ReportConfig::default()) {
        let _ = saldo::pdf::to_pdf(&report, &RenderOptions::default());
    }
});
