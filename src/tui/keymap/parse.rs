use super::{Action, Binding, CustomKeymap, KeyCombo, Keymap, KeymapBindings};
use crate::config::{KEYMAPS_FILE, config_file, read_toml_file};
use crossterm::event::{KeyCode, KeyModifiers};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const MAX_BINDINGS_PER_MODE: usize = 512;
const MAX_TOTAL_BINDINGS: usize = 1_024;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapsFile {
    meta: Option<KeymapsMeta>,
    keymaps: Option<HashMap<String, KeymapFile>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapsMeta {
    default: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapFile {
    description: Option<String>,
    normal: Option<HashMap<String, String>>,
    edit: Option<HashMap<String, String>>,
    command: Option<HashMap<String, String>>,
}

/// Resolve the keymap to use.
///
/// `requested` wins over `[meta] default`; unknown names fall back to the
/// built-in vim keymap. Problems are returned as warnings, never errors.
pub fn load_keymap(requested: Option<&str>, keymap_file: Option<&Path>) -> (Keymap, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let config_path: Option<PathBuf> = keymap_file
        .map(Path::to_path_buf)
        .or_else(|| config_file(KEYMAPS_FILE));
    let file: Option<KeymapsFile> = config_path.as_ref().and_then(|path| {
        read_toml_file(path, keymap_file.is_some(), &mut warnings)
    });
    let source = config_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| KEYMAPS_FILE.to_string());

    let requested_name = requested.map(str::trim).filter(|s| !s.is_empty());
    let default_name = file
        .as_ref()
        .and_then(|f| f.meta.as_ref())
        .and_then(|m| m.default.as_deref());
    let target = requested_name.or(default_name).unwrap_or("vim");
    let custom_entry = file
        .as_ref()
        .and_then(|f| f.keymaps.as_ref())
        .and_then(|keymaps| keymaps.get(target));

    match custom_entry {
        Some(entry) => match build_custom_keymap(target, entry) {
            Ok(custom) => return (Keymap::Custom(custom), warnings),
            Err(errs) => warnings.extend(errs),
        },
        None if !is_builtin_keymap(target) => {
            if requested_name.is_some() {
                warnings.push(format!("Keymap '{}' not found in {}", target, source));
            } else {
                warnings.push(format!(
                    "Default keymap '{}' not found in {}; falling back to built-in 'vim'",
                    target, source
                ));
            }
        }
        None => {}
    }

    if target.eq_ignore_ascii_case("emacs") {
        return (Keymap::Emacs, warnings);
    }
    if requested_name.is_some() && !target.eq_ignore_ascii_case("vim") {
        warnings.push(format!("Falling back to built-in 'vim' keymap for '{}'", target));
    }
    (Keymap::Vim, warnings)
}

fn is_builtin_keymap(name: &str) -> bool {
    name.eq_ignore_ascii_case("vim") || name.eq_ignore_ascii_case("emacs")
}

fn build_custom_keymap(name: &str, entry: &KeymapFile) -> Result<CustomKeymap, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let normal = parse_mode_bindings("normal", entry.normal.as_ref(), &mut errors);
    let edit = parse_mode_bindings("edit", entry.edit.as_ref(), &mut errors);
    let command = parse_mode_bindings("command", entry.command.as_ref(), &mut errors);
    let total = normal.len() + edit.len() + command.len();
    if total > MAX_TOTAL_BINDINGS {
        errors.push(format!(
            "Too many total bindings: {} (max {})",
            total, MAX_TOTAL_BINDINGS
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(CustomKeymap {
        name: name.to_string(),
        description: entry.description.clone(),
        bindings: KeymapBindings {
            normal,
            edit,
            command,
        },
    })
}

fn parse_mode_bindings(
    mode: &str,
    raw: Option<&HashMap<String, String>>,
    errors: &mut Vec<String>,
) -> Vec<Binding> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.len() > MAX_BINDINGS_PER_MODE {
        errors.push(format!(
            "Too many {} bindings: {} (max {})",
            mode,
            raw.len(),
            MAX_BINDINGS_PER_MODE
        ));
        return Vec::new();
    }

    let mut bindings: Vec<Binding> = Vec::with_capacity(raw.len());
    for (combo_str, action_str) in raw {
        let combo = match parse_key_combo(combo_str) {
            Ok(combo) => combo,
            Err(err) => {
                errors.push(format!(
                    "Invalid key '{}' in {} bindings: {}",
                    combo_str, mode, err
                ));
                continue;
            }
        };
        let Some(action) = action_from_str(action_str) else {
            errors.push(format!("Invalid action '{}' in {} bindings", action_str, mode));
            continue;
        };
        if bindings.iter().any(|binding| binding.combo == combo) {
            errors.push(format!(
                "Duplicate key '{}' in {} bindings",
                combo.display(),
                mode
            ));
            continue;
        }
        bindings.push(Binding { combo, action });
    }
    bindings
}

/// Parse `C-s`, `M-x`, `C-M-Left`, `Enter`, `-`, `C--` and the like.
fn parse_key_combo(input: &str) -> Result<KeyCombo, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }
    if let Some(ch) = single_char(trimmed) {
        return Ok(KeyCombo {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::empty(),
        });
    }

    // A trailing '-' is the dash key itself: "C--".
    let (mod_str, key_part) = match trimmed.strip_suffix("--") {
        Some(mods) => (Some(mods), "-"),
        None if trimmed.ends_with('-') => return Err("missing modifier before '-'".to_string()),
        None => match trimmed.rsplit_once('-') {
            Some((mods, key)) => (Some(mods), key),
            None => (None, trimmed),
        },
    };

    let modifiers = match mod_str {
        Some("") => return Err("missing modifier before '-'".to_string()),
        Some(mods) => parse_modifiers(mods)?,
        None => KeyModifiers::empty(),
    };
    Ok(KeyCombo {
        code: parse_key_code(key_part)?,
        modifiers,
    })
}

fn parse_modifiers(input: &str) -> Result<KeyModifiers, String> {
    let mut modifiers = KeyModifiers::empty();
    for part in input.split('-') {
        let raw = part.trim();
        let flag = match raw.to_ascii_lowercase().as_str() {
            "" => return Err("empty modifier segment".to_string()),
            "c" | "ctrl" | "control" => KeyModifiers::CONTROL,
            "m" | "alt" | "meta" => KeyModifiers::ALT,
            "s" | "shift" => KeyModifiers::SHIFT,
            _ => return Err(format!("unknown modifier '{}'", raw)),
        };
        if modifiers.contains(flag) {
            return Err(format!("duplicate modifier '{}'", raw));
        }
        modifiers.insert(flag);
    }
    Ok(modifiers)
}

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::Enter),
    ("return", KeyCode::Enter),
    ("esc", KeyCode::Esc),
    ("escape", KeyCode::Esc),
    ("backspace", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("del", KeyCode::Delete),
    ("tab", KeyCode::Tab),
    ("backtab", KeyCode::BackTab),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("space", KeyCode::Char(' ')),
    ("spc", KeyCode::Char(' ')),
    ("dash", KeyCode::Char('-')),
    ("minus", KeyCode::Char('-')),
    ("plus", KeyCode::Char('+')),
    ("percent", KeyCode::Char('%')),
    ("greater", KeyCode::Char('>')),
    ("less", KeyCode::Char('<')),
    ("comma", KeyCode::Char(',')),
    ("period", KeyCode::Char('.')),
    ("slash", KeyCode::Char('/')),
    ("question", KeyCode::Char('?')),
    ("colon", KeyCode::Char(':')),
    ("semicolon", KeyCode::Char(';')),
    ("equal", KeyCode::Char('=')),
];

fn parse_key_code(input: &str) -> Result<KeyCode, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }
    if let Some(ch) = single_char(trimmed) {
        return Ok(KeyCode::Char(ch));
    }
    let norm = trimmed.to_ascii_lowercase();
    NAMED_KEYS
        .iter()
        .find(|(name, _)| *name == norm)
        .map(|(_, code)| *code)
        .ok_or_else(|| format!("unknown key '{}'", input))
}

fn single_char(input: &str) -> Option<char> {
    let mut chars = input.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}

fn action_from_str(input: &str) -> Option<Action> {
    let action = match input.trim().to_ascii_lowercase().as_str() {
        "cancel" => Action::Cancel,
        "enter_edit" => Action::EnterEdit,
        "commit_edit" => Action::CommitEdit,
        "enter_command" => Action::EnterCommand,
        "execute_command" => Action::ExecuteCommand,
        "clear_cell" => Action::ClearCell,
        "add_item" => Action::AddItem,
        "add_member" => Action::AddMember,
        "delete_row" => Action::DeleteRow,
        "delete_column" => Action::DeleteColumn,
        "global_discount" => Action::GlobalDiscount,
        "global_tax" => Action::GlobalTax,
        "toggle_share_mode" => Action::ToggleShareMode,
        "clear_data" => Action::ClearData,
        "help" => Action::Help,
        "move_left" => Action::Move(-1, 0),
        "move_right" => Action::Move(1, 0),
        "move_up" => Action::Move(0, -1),
        "move_down" => Action::Move(0, 1),
        "page_up" => Action::Page(-1),
        "page_down" => Action::Page(1),
        "home_col" => Action::HomeCol,
        "end_col" => Action::EndCol,
        "goto_first" => Action::GotoFirst,
        "goto_last" => Action::GotoLast,
        "inc_col_width" => Action::IncColWidth,
        "dec_col_width" => Action::DecColWidth,
        "save" => Action::Save,
        "quit" => Action::Quit,
        _ => return None,
    };
    Some(action)
}
