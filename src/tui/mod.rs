//! Terminal UI: modal table editor for the bill.

mod actions;
mod app;
mod command;
mod help;
mod input;
mod keymap;
mod ui;

pub use app::App;
pub use keymap::load_keymap;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tracing::warn;

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)
}

/// The event loop's outcome wins over a failed cleanup step, which is only logged.
fn loop_outcome(res: io::Result<()>, cleanup: io::Result<()>, step: &str) -> io::Result<()> {
    if let Err(e) = cleanup {
        warn!(error = %e, step, "terminal cleanup failed");
        if res.is_ok() {
            return Err(e);
        }
    }
    res
}

/// Take over the terminal and run the editor until the user quits.
///
/// The terminal is restored even when the event loop fails.
pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .and_then(|mut terminal| {
            let res = input::run_app(&mut terminal, app);
            loop_outcome(res, terminal.show_cursor(), "show cursor")
        });

    loop_outcome(result, restore_terminal(), "restore terminal")?;
    Ok(())
}
