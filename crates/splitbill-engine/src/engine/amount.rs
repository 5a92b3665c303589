//! Lenient amount parsing and fixed-point formatting.
//!
//! Cells are free text. Reading a number takes the longest decimal prefix
//! after leading whitespace, so `"15%"` is 15 and `"abc"` is 0. Nothing here
//! fails: anything unreadable is zero.

use regex::Regex;
use std::sync::OnceLock;

fn amount_prefix_re() -> &'static Regex {
    static AMOUNT_RE: OnceLock<Regex> = OnceLock::new();
    AMOUNT_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("amount prefix regex must compile")
    })
}

/// Parse the leading number of a cell value. Unparsable or non-finite input is 0.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let Some(m) = amount_prefix_re().find(trimmed) else {
        return 0.0;
    };
    match m.as_str().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Format with exactly two decimals, rounding half away from zero.
pub fn to_fixed(n: f64) -> String {
    if !n.is_finite() {
        return "0.00".to_string();
    }
    let cents = (n * 100.0).round();
    if cents == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", cents / 100.0)
}

/// Round to cents the same way the displayed value is rounded.
pub fn round_cents(n: f64) -> f64 {
    parse_amount(&to_fixed(n))
}
