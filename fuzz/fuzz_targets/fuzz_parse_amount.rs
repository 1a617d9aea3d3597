#![no_main]

use libfuzzer_sys::fuzz_target;
use saldo::core::{CellValue, parse_amount};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Some(amount) = parse_amount(&CellValue::from(s)) {
            let _ = saldo::pdf::format_money(amount);
        }
    }
});
