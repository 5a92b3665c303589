//! Computed table view shared by the exporters.

use crate::bill::Bill;
use splitbill_engine::engine::{Row, SUBTOTAL_KEY, column_key, is_member_column};

pub const REMAINING_HEADER: &str = "Amount Remaining";
pub const TOTAL_LABEL: &str = "Total";

/// What a single exported cell shows.
pub(crate) enum ExportCell {
    /// Raw text as entered.
    Text(String),
    /// Computed amount.
    Amount(String),
    /// A member cell: entered percentage and the computed share.
    Share { percent: String, amount: String },
}

pub(crate) fn header(bill: &Bill) -> Vec<String> {
    let mut header: Vec<String> = bill.columns().to_vec();
    header.push(REMAINING_HEADER.to_string());
    header
}

pub(crate) fn row_cells(bill: &Bill, row: &Row) -> Vec<ExportCell> {
    let mut cells: Vec<ExportCell> = bill
        .columns()
        .iter()
        .map(|col| {
            if column_key(col) == SUBTOTAL_KEY {
                ExportCell::Amount(bill.calculate_subtotal(row))
            } else if is_member_column(col) {
                ExportCell::Share {
                    percent: row.value(col).to_string(),
                    amount: bill.calculate_member_share(row, col),
                }
            } else {
                ExportCell::Text(row.value(col).to_string())
            }
        })
        .collect();
    cells.push(ExportCell::Amount(bill.calculate_amount_remaining(row)));
    cells
}

/// Footer: label under the first column, grand total under Sub-Total, member
/// totals under member columns.
pub(crate) fn footer(bill: &Bill) -> Vec<String> {
    let mut footer: Vec<String> = bill
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            if column_key(col) == SUBTOTAL_KEY {
                bill.calculate_total()
            } else if is_member_column(col) {
                bill.calculate_member_total(col)
            } else if idx == 0 {
                TOTAL_LABEL.to_string()
            } else {
                String::new()
            }
        })
        .collect();
    footer.push(String::new());
    footer
}
