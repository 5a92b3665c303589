//! Derived amounts: subtotals, member shares, totals and remainders.
//!
//! Every function returns the two-decimal display string. Sums are taken over
//! the re-parsed display values, so a total always equals the sum of the
//! amounts shown for its rows.

use super::amount::{parse_amount, round_cents, to_fixed};
use super::row::{
    DISCOUNT_KEY, PRICE_KEY, QUANTITY_KEY, Row, TAX_KEY, column_key, is_reserved_key,
};

/// What to show when members have been allocated more than a row's subtotal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// Report the negative remainder as is.
    #[default]
    Unclamped,
    /// Report `0.00` instead of a negative remainder.
    ClampAtZero,
}

fn cell(row: &Row, key: &str) -> f64 {
    parse_amount(row.get(key).unwrap_or(""))
}

fn subtotal_value(row: &Row) -> f64 {
    let quantity = cell(row, QUANTITY_KEY);
    let price = cell(row, PRICE_KEY);
    let discount = cell(row, DISCOUNT_KEY);
    let tax = cell(row, TAX_KEY);
    let subtotal = quantity * price;
    let discount_amount = subtotal * discount / 100.0;
    // Tax applies to the undiscounted amount.
    let tax_amount = subtotal * tax / 100.0;
    subtotal - discount_amount + tax_amount
}

fn share_value(row: &Row, column: &str) -> f64 {
    let subtotal = round_cents(subtotal_value(row));
    let percentage = parse_amount(row.get(&column_key(column)).unwrap_or(""));
    subtotal * percentage / 100.0
}

/// `quantity * price`, less discount%, plus tax% of the same base.
pub fn subtotal(row: &Row) -> String {
    to_fixed(subtotal_value(row))
}

/// The member's percentage of the row subtotal.
pub fn member_share(row: &Row, column: &str) -> String {
    to_fixed(share_value(row, column))
}

/// Sum of one member's shares across all rows.
pub fn member_total(rows: &[Row], column: &str) -> String {
    let sum: f64 = rows
        .iter()
        .map(|row| round_cents(share_value(row, column)))
        .sum();
    to_fixed(sum)
}

/// Sum of every row's subtotal.
pub fn total(rows: &[Row]) -> String {
    let sum: f64 = rows
        .iter()
        .map(|row| round_cents(subtotal_value(row)))
        .sum();
    to_fixed(sum)
}

/// Row subtotal minus the shares of every member column.
pub fn amount_remaining<S: AsRef<str>>(row: &Row, columns: &[S], policy: RemainderPolicy) -> String {
    let subtotal = round_cents(subtotal_value(row));
    let allocated: f64 = columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|col| !is_reserved_key(&column_key(col)))
        .map(|col| round_cents(share_value(row, col)))
        .sum();
    let remaining = subtotal - allocated;
    match policy {
        RemainderPolicy::ClampAtZero if remaining < 0.0 => to_fixed(0.0),
        _ => to_fixed(remaining),
    }
}
