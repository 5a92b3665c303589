use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::prelude::*;
use std::io;

use super::actions::{ApplyResult, apply_action, handle_command_text, handle_edit_text};
use super::app::{App, Mode};
use super::keymap::{Action, Keymap, translate};
use super::ui;

fn clear_pending_vim_state(app: &mut App) {
    app.pending_g = false;
    app.pending_d = false;
}

fn handle_mouse_event(app: &mut App, terminal_area: Rect, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    if app.help_modal || app.picker.is_some() || app.confirm_clear || app.mode != Mode::Normal {
        return;
    }

    let [_cell_area, table_area, _status_area] = ui::split_main_chunks(terminal_area);
    if let Some((col, row)) = ui::grid_cell_at(app, table_area, mouse.column, mouse.row) {
        app.cursor_col = col;
        app.cursor_row = row;
        app.update_viewport();
        clear_pending_vim_state(app);
    }
}

/// Keys while the help overlay is open.
fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_help_modal(),
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.close_help_modal()
        }
        KeyCode::Down | KeyCode::Char('j') => app.scroll_help_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_help_by(-1),
        KeyCode::PageDown => app.scroll_help_by(12),
        KeyCode::PageUp => app.scroll_help_by(-12),
        KeyCode::Home | KeyCode::Char('g') => app.scroll_help_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.scroll_help_to_end(),
        _ => {}
    }
}

/// Keys while a unit or share picker is open.
fn handle_picker_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.picker_cancel(),
        KeyCode::Char('g') if ctrl => app.picker_cancel(),
        KeyCode::Enter => app.picker_commit(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.picker_move(1),
        KeyCode::Char('n') if ctrl => app.picker_move(1),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.picker_move(-1),
        KeyCode::Char('p') if ctrl => app.picker_move(-1),
        KeyCode::Home => app.picker_move(i32::MIN),
        KeyCode::End => app.picker_move(i32::MAX),
        _ => {}
    }
}

/// Process one key press. Returns `ApplyResult::Quit` when the app should exit.
fn handle_key(app: &mut App, key: KeyEvent) -> ApplyResult {
    if app.help_modal {
        handle_help_key(app, key);
        return ApplyResult::Continue;
    }

    if app.picker.is_some() {
        handle_picker_key(app, key);
        return ApplyResult::Continue;
    }

    // Destructive: anything but y/Y cancels.
    if app.confirm_clear {
        let yes = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
        app.confirm_clear_data(yes);
        return ApplyResult::Continue;
    }

    // Handle Vim key sequences (gg, dd) in Normal mode
    if matches!(app.keymap, Keymap::Vim) && app.mode == Mode::Normal {
        if key.code == KeyCode::Char('g') && key.modifiers.is_empty() {
            if app.pending_g {
                app.pending_g = false;
                return apply_action(app, Action::GotoFirst);
            }
            app.pending_g = true;
            app.pending_d = false;
            return ApplyResult::Continue;
        }
        app.pending_g = false;

        if key.code == KeyCode::Char('d') && key.modifiers.is_empty() {
            if app.pending_d {
                app.pending_d = false;
                return apply_action(app, Action::DeleteRow);
            }
            app.pending_d = true;
            return ApplyResult::Continue;
        }
        // 'd' followed by something else: drop it and handle the key normally
        app.pending_d = false;
    }

    if let Some(action) = translate(&app.keymap, app.mode, key) {
        return apply_action(app, action);
    }

    // Text entry fallbacks (not bound in keymaps).
    match app.mode {
        Mode::Edit | Mode::Prompt(_) => handle_edit_text(app, key),
        Mode::Command => handle_command_text(app, key),
        Mode::Normal => {}
    }
    ApplyResult::Continue
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match event::read()? {
            Event::Key(key) => {
                // Only process key press events (Windows reports Press + Release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(app, key) == ApplyResult::Quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                let terminal_area = Rect::new(0, 0, size.width, size.height);
                handle_mouse_event(app, terminal_area, mouse);
            }
            _ => {}
        }
    }
}
