//! CSV export

use super::table::{ExportCell, footer, header, row_cells};
use crate::bill::Bill;
use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Write the bill as CSV: computed subtotals, member shares as amounts, and a
/// total row.
pub fn write_csv(path: &Path, bill: &Bill) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(render_csv(bill).as_bytes())?;
    Ok(())
}

pub(crate) fn render_csv(bill: &Bill) -> String {
    let mut out = String::new();
    push_line(&mut out, header(bill));
    for row in bill.rows() {
        let fields = row_cells(bill, row).into_iter().map(|cell| match cell {
            ExportCell::Text(s) | ExportCell::Amount(s) => s,
            ExportCell::Share { amount, .. } => amount,
        });
        push_line(&mut out, fields);
    }
    push_line(&mut out, footer(bill));
    out
}

fn push_line(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let escaped: Vec<String> = fields.into_iter().map(|f| escape_csv_field(&f)).collect();
    out.push_str(&escaped.join(","));
    out.push('\n');
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    // Computed amounts may be negative; only free text gets the injection guard.
    let looks_numeric = field.parse::<f64>().is_ok();
    let first_non_space = field.trim_start_matches([' ', '\t']).chars().next();
    let safe_field = if !looks_numeric && matches!(first_non_space, Some('=' | '+' | '-' | '@')) {
        format!("'{}", field)
    } else {
        field.to_string()
    };

    if safe_field.contains(',')
        || safe_field.contains('"')
        || safe_field.contains('\n')
        || safe_field.contains('\r')
    {
        format!("\"{}\"", safe_field.replace('"', "\"\""))
    } else {
        safe_field
    }
}
