//! Markdown export functionality

use super::table::{ExportCell, footer, header, row_cells};
use crate::bill::Bill;
use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Write the bill to a markdown file
pub fn write_markdown(path: &Path, bill: &Bill, currency: &str) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    render_markdown(&mut file, bill, currency)?;
    Ok(())
}

pub fn render_markdown<W: Write>(w: &mut W, bill: &Bill, currency: &str) -> std::io::Result<()> {
    writeln!(w, "# Bill")?;
    writeln!(w)?;

    if bill.is_empty() {
        writeln!(w, "*No items*")?;
        return Ok(());
    }

    let header = header(bill);
    write!(w, "|")?;
    for col in &header {
        write!(w, " {} |", escape_markdown(col))?;
    }
    writeln!(w)?;

    write!(w, "|")?;
    for _ in &header {
        write!(w, "---|")?;
    }
    writeln!(w)?;

    for row in bill.rows() {
        write!(w, "|")?;
        for cell in row_cells(bill, row) {
            let text = match cell {
                ExportCell::Text(s) => escape_markdown(&s),
                ExportCell::Amount(s) => format!("{} {}", currency, s),
                ExportCell::Share { percent, amount } if percent.trim().is_empty() => {
                    format!("{} {}", currency, amount)
                }
                ExportCell::Share { percent, amount } => {
                    format!("{}% ({} {})", escape_markdown(percent.trim()), currency, amount)
                }
            };
            write!(w, " {} |", text)?;
        }
        writeln!(w)?;
    }

    write!(w, "|")?;
    for value in footer(bill) {
        if value.is_empty() {
            write!(w, " |")?;
        } else if value.parse::<f64>().is_ok() {
            write!(w, " **{} {}** |", currency, value)?;
        } else {
            write!(w, " **{}** |", escape_markdown(&value))?;
        }
    }
    writeln!(w)?;

    writeln!(w)?;
    writeln!(w, "Total: {} {}", currency, bill.calculate_total())?;
    Ok(())
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bill: &Bill) -> String {
        let mut out = Vec::new();
        render_markdown(&mut out, bill, "$").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_markdown_empty_bill() {
        assert_eq!(render(&Bill::new()), "# Bill\n\n*No items*\n");
    }

    #[test]
    fn test_markdown_table_rows_and_totals() {
        let mut bill = Bill::new();
        bill.add_column("Alice");
        let id = bill.add_row();
        bill.update_row(&id, "Item", "Fish | Chips");
        bill.update_row(&id, "Quantity", "2");
        bill.update_row(&id, "Price", "10");
        bill.update_row(&id, "Discount", "10");
        bill.update_row(&id, "Tax", "5");
        bill.update_row(&id, "Alice", "50");

        let md = render(&bill);
        assert!(md.contains(
            "| Item | Quantity | Unit | Price | Discount | Tax | Sub-Total | Alice | Amount Remaining |"
        ));
        assert!(md.contains("| Fish \\| Chips | 2 |  | 10 | 10 | 5 | $ 19.00 | 50% ($ 9.50) | $ 9.50 |"));
        assert!(md.contains("| **Total** | | | | | | **$ 19.00** | **$ 9.50** | |"));
        assert!(md.ends_with("Total: $ 19.00\n"));
    }

    #[test]
    fn test_write_markdown_reports_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("bill.md");
        let err = write_markdown(&path, &Bill::new(), "$").unwrap_err();
        assert!(matches!(err, crate::error::SplitError::Io(_)));
    }
}
