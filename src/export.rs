//! File export shared by `-o` and `:export`.

use anyhow::{Context, Result};
use splitbill_core::Bill;
use splitbill_core::storage::{write_csv, write_markdown};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Markdown,
}

impl ExportFormat {
    /// `.csv` exports CSV; anything else exports Markdown.
    pub fn for_path(path: &Path) -> Self {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            ExportFormat::Csv
        } else {
            ExportFormat::Markdown
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Markdown => "Markdown",
        }
    }
}

pub fn export_bill(path: &Path, bill: &Bill, currency: &str) -> Result<ExportFormat> {
    let format = ExportFormat::for_path(path);
    match format {
        ExportFormat::Csv => write_csv(path, bill)
            .with_context(|| format!("failed to write {}", path.display()))?,
        ExportFormat::Markdown => write_markdown(path, bill, currency)
            .with_context(|| format!("failed to write {}", path.display()))?,
    }
    tracing::info!(path = %path.display(), format = format.name(), "exported bill");
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ExportFormat::for_path(Path::new("a.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::for_path(Path::new("A.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::for_path(Path::new("a.md")), ExportFormat::Markdown);
        assert_eq!(ExportFormat::for_path(Path::new("bill")), ExportFormat::Markdown);
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bill.md");
        let format = export_bill(&path, &Bill::new(), "$").unwrap();
        assert_eq!(format, ExportFormat::Markdown);
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("# Bill"));
    }

    #[test]
    fn export_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("bill.csv");
        let err = export_bill(&path, &Bill::new(), "$").unwrap_err();
        assert!(err.to_string().contains("bill.csv"));
    }
}
