use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::CellValue;

/// Read a monetary amount from a cell.
///
/// Numbers convert directly. Text may carry spaces, non-breaking spaces, a
/// `€` sign, a decimal comma, and either `.` or `,` as thousands separator.
/// Returns `None` for anything that is not a number.
pub fn parse_amount(value: &CellValue) -> Option<Decimal> {
    match value {
        CellValue::Number(n) => Decimal::from_f64(*n),
        CellValue::Int(i) => Some(Decimal::from(*i)),
        CellValue::String(s) => parse_amount_text(s),
        _ => None,
    }
}

fn parse_amount_text(s: &str) -> Option<Decimal> {
    let mut t: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€')
        .collect();
    if t.is_empty() {
        return None;
    }
    match (t.rfind(','), t.rfind('.')) {
        // 1.234,50
        (Some(comma), Some(dot)) if dot < comma => {
            t = t.replace('.', "").replace(',', ".");
        }
        // 1,234.50
        (Some(_), Some(_)) => {
            t = t.replace(',', "");
        }
        (Some(_), None) => {
            t = t.replace(',', ".");
        }
        _ => {}
    }
    Decimal::from_str(&t).ok()
}

/// Round to cents, midpoint away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
