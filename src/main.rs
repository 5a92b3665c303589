//! splitbill - split a restaurant bill between people from the terminal

mod config;
mod export;
mod tui;

use anyhow::{Context, Result, bail};
use clap::Parser;
use splitbill_core::{Bill, FileStore, Persistence};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `splitbill_core=trace`).
const LOG_ENV: &str = "SPLITBILL_LOG";

#[derive(Parser, Debug)]
#[command(name = "splitbill", version, about = "Split a bill between people")]
struct Cli {
    /// Directory holding the saved bill (default: user data dir)
    #[arg(long, value_name = "DIR", conflicts_with = "no_persist")]
    store: Option<PathBuf>,

    /// Keep the bill in memory only
    #[arg(long)]
    no_persist: bool,

    /// Settings file (default: settings.toml in the user config dir)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keybindings: vim, emacs, or a custom keymap name
    #[arg(long, value_name = "NAME")]
    keymap: Option<String>,

    /// Load custom keymaps from this TOML file
    #[arg(long, value_name = "FILE")]
    keymap_file: Option<PathBuf>,

    /// Write logs here (default: splitbill.log in the user data dir)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Export the saved bill (.csv for CSV, otherwise Markdown) and exit
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the grand total and each member's total and exit
    #[arg(long)]
    summary: bool,

    /// Delete the saved bill and exit
    #[arg(long, conflicts_with = "no_persist")]
    clear: bool,

    /// Don't ask before --clear
    #[arg(long, requires = "clear")]
    yes: bool,
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Send logs to a file; the terminal belongs to the UI.
fn init_logging(log_file: Option<&Path>) {
    let path = log_file
        .map(Path::to_path_buf)
        .or_else(|| config::data_dir().map(|dir| dir.join(config::LOG_FILE)));
    let Some(path) = path else {
        return;
    };
    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(e) => {
            if log_file.is_some() {
                eprintln!("Warning: cannot open log file {}: {}", path.display(), e);
            }
            return;
        }
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn confirm_clear() -> Result<bool> {
    print!("Delete the saved bill? [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_summary(bill: &Bill, currency: &str) {
    println!("Total: {} {}", currency, bill.calculate_total());
    for member in bill.member_columns() {
        println!("{}: {} {}", member, currency, bill.calculate_member_total(member));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref());

    let (settings, warnings) = config::load_settings(cli.config.as_deref());
    for warning in warnings {
        warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    let mut persistence = if cli.no_persist {
        None
    } else {
        let dir = match cli.store.clone().or_else(config::data_dir) {
            Some(dir) => dir,
            None => bail!("no data directory available; pass --store DIR or --no-persist"),
        };
        info!(dir = %dir.display(), key = %settings.storage_key, "using file store");
        Some(Persistence::new(
            Box::new(FileStore::new(dir)),
            settings.storage_key.clone(),
        ))
    };

    if cli.clear {
        if !cli.yes && !confirm_clear()? {
            println!("Nothing cleared");
            return Ok(());
        }
        if let Some(p) = persistence.as_mut() {
            p.clear().context("failed to clear saved bill")?;
        }
        println!("Cleared saved bill");
        return Ok(());
    }

    let non_interactive = cli.summary || cli.output.is_some();
    let mut load_error: Option<String> = None;
    let mut bill = match persistence.as_ref().map(Persistence::load) {
        Some(Ok(Some(bill))) => bill,
        Some(Ok(None)) | None => Bill::new(),
        Some(Err(e)) if non_interactive => {
            return Err(e).context("failed to load saved bill");
        }
        Some(Err(e)) => {
            warn!(error = %e, "saved bill unreadable; starting empty");
            load_error = Some(e.to_string());
            Bill::new()
        }
    };
    bill.remainder_policy = settings.remainder;

    if non_interactive {
        if cli.summary {
            print_summary(&bill, &settings.currency);
        }
        if let Some(path) = cli.output.as_deref() {
            let format = export::export_bill(path, &bill, &settings.currency)?;
            println!("Exported {} to {}", format.name(), path.display());
        }
        return Ok(());
    }

    let (keymap, warnings) = tui::load_keymap(cli.keymap.as_deref(), cli.keymap_file.as_deref());
    for warning in warnings {
        warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    let mut app = tui::App::with_bill(bill, persistence, &settings, keymap);
    if let Some(err) = load_error {
        app.status_message = format!(
            "Error: saved bill unreadable ({}); starting empty, it is replaced on your next change",
            err
        );
    }
    tui::run(&mut app)?;
    info!("exiting");
    Ok(())
}
