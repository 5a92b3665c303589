//! `:` command line parsing.

use splitbill_core::ShareInputMode;
use std::path::PathBuf;
use thiserror::Error;

/// A parsed command-line command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    AddItem,
    AddMember(String),
    DeleteRow,
    /// Delete the named column, or the one under the cursor.
    DeleteColumn(Option<String>),
    Discount(String),
    Tax(String),
    /// Set the share input mode, or toggle it.
    ShareMode(Option<ShareInputMode>),
    ClearData,
    Export(PathBuf),
    ColumnWidth(usize),
    Write,
    Quit { force: bool },
    WriteQuit,
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("{0}")]
    InvalidArgument(String),
}

impl Command {
    pub fn parse(input: &str) -> Result<Option<Command>, CommandError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        let (name, args) = match input.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim()).filter(|s| !s.is_empty())),
            None => (input, None),
        };

        let command = match name {
            "item" | "add" => Command::AddItem,
            "member" | "m" => {
                let name = args.ok_or(CommandError::Usage(":member NAME"))?;
                Command::AddMember(name.to_string())
            }
            "delrow" | "dr" => Command::DeleteRow,
            "delcol" | "dc" => Command::DeleteColumn(args.map(str::to_string)),
            "discount" => {
                Command::Discount(args.ok_or(CommandError::Usage(":discount PCT"))?.to_string())
            }
            "tax" => Command::Tax(args.ok_or(CommandError::Usage(":tax PCT"))?.to_string()),
            "mode" => match args {
                None => Command::ShareMode(None),
                Some(raw) => Command::ShareMode(Some(
                    raw.parse::<ShareInputMode>()
                        .map_err(CommandError::InvalidArgument)?,
                )),
            },
            "clear" => Command::ClearData,
            "export" => {
                Command::Export(PathBuf::from(args.ok_or(CommandError::Usage(":export FILE"))?))
            }
            "colwidth" | "cw" => {
                let raw = args.ok_or(CommandError::Usage(":colwidth WIDTH"))?;
                let width = raw
                    .parse::<usize>()
                    .map_err(|_| CommandError::InvalidArgument(format!("Invalid width: {}", raw)))?;
                Command::ColumnWidth(width)
            }
            "w" | "save" => Command::Write,
            "q" | "quit" => Command::Quit { force: false },
            "q!" => Command::Quit { force: true },
            "wq" | "x" => Command::WriteQuit,
            "help" | "h" => Command::Help,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bill_commands() {
        assert_eq!(Command::parse("item"), Ok(Some(Command::AddItem)));
        assert_eq!(
            Command::parse("member  Mary Jane "),
            Ok(Some(Command::AddMember("Mary Jane".to_string())))
        );
        assert_eq!(Command::parse("delcol"), Ok(Some(Command::DeleteColumn(None))));
        assert_eq!(
            Command::parse("delcol Bob"),
            Ok(Some(Command::DeleteColumn(Some("Bob".to_string()))))
        );
        assert_eq!(
            Command::parse("discount 15"),
            Ok(Some(Command::Discount("15".to_string())))
        );
        assert_eq!(
            Command::parse("mode fraction"),
            Ok(Some(Command::ShareMode(Some(ShareInputMode::Fraction))))
        );
        assert_eq!(
            Command::parse("export out.csv"),
            Ok(Some(Command::Export(PathBuf::from("out.csv"))))
        );
        assert_eq!(Command::parse("q!"), Ok(Some(Command::Quit { force: true })));
    }

    #[test]
    fn empty_input_is_no_command() {
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn missing_arguments_report_usage() {
        assert_eq!(
            Command::parse("member"),
            Err(CommandError::Usage(":member NAME"))
        );
        assert_eq!(Command::parse("tax "), Err(CommandError::Usage(":tax PCT")));
        assert_eq!(
            Command::parse("export").unwrap_err().to_string(),
            "Usage: :export FILE"
        );
    }

    #[test]
    fn bad_arguments_and_unknown_commands() {
        assert_eq!(
            Command::parse("frobnicate now"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
        assert!(matches!(
            Command::parse("mode thirds"),
            Err(CommandError::InvalidArgument(_))
        ));
        assert_eq!(
            Command::parse("cw wide").unwrap_err().to_string(),
            "Invalid width: wide"
        );
    }
}
