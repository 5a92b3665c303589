//! Keymap translation layer.
//!
//! Keys map to [`Action`]s here; the app only ever sees actions.
//! - Vim: single letters drive bill actions, `:` opens the command line.
//! - Emacs: bill actions live on M- chords, so bare letters are never bound.

mod defaults;
mod parse;
mod types;

pub use parse::load_keymap;
pub use types::{Action, Binding, CustomKeymap, KeyCombo, Keymap, KeymapBindings};

use crate::tui::app::Mode;
use crossterm::event::KeyEvent;

/// Translate a key event to an action based on the current keymap and mode.
///
/// Returns `None` if the key has no binding in the current context.
pub fn translate(keymap: &Keymap, mode: Mode, key: KeyEvent) -> Option<Action> {
    match keymap {
        Keymap::Vim => defaults::translate_vim(mode, key),
        Keymap::Emacs => defaults::translate_emacs(mode, key),
        Keymap::Custom(custom) => custom.translate(mode, key),
    }
}
