//! Help text content for the help modal

use super::keymap::{Action, Binding, CustomKeymap, Keymap};

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|s| s.to_string()).collect()
}

pub fn get_about_help() -> Vec<String> {
    lines(&[
        "About splitbill",
        "",
        "Each row is a line item. Sub-Total = quantity x price, less the",
        "discount %, plus the tax %. Every member column holds that",
        "member's share of the row, as a percent (50) or as a fraction",
        "picked from a list. Amount Remaining is what is still unassigned.",
        "The bill is saved after every change.",
    ])
}

/// Get keybinding help text for the current keymap
pub fn get_help_text(keymap: &Keymap) -> Vec<String> {
    match keymap {
        Keymap::Vim => lines(&[
            "Navigation:",
            "  h/j/k/l      Move left/down/up/right",
            "  Arrow keys   Move cursor",
            "  Tab/S-Tab    Next/previous column",
            "  PageUp/Down  Scroll by page",
            "  0/$          First/last column",
            "  gg/G         First/last item",
            "  Click        Select cell",
            "",
            "Editing:",
            "  i / Enter    Edit cell (Unit and shares open a picker)",
            "  x / Delete   Clear cell",
            "  Esc          Cancel edit",
            "",
            "Bill:",
            "  o            Add item",
            "  m            Add member",
            "  dd           Delete item",
            "  D            Delete member column under cursor",
            "  %            Discount every item",
            "  T            Tax every item",
            "  f            Toggle percent/fraction shares",
            "  C            Clear all data",
            "",
            "Other:",
            "  :            Enter command mode",
            "  Ctrl+s       Save",
            "  +/-          Adjust column width",
            "  ?            This help",
        ]),
        Keymap::Emacs => lines(&[
            "Navigation:",
            "  C-n/C-p      Move down/up",
            "  C-f/C-b      Move right/left",
            "  Arrow keys   Move cursor",
            "  C-v/M-v      Page down/up",
            "  C-a/C-e      First/last column",
            "  M-</M->      First/last item",
            "",
            "Editing:",
            "  Enter        Edit cell (Unit and shares open a picker)",
            "  C-d/Delete   Clear cell",
            "  C-g / Esc    Cancel",
            "",
            "Bill:",
            "  M-i          Add item",
            "  M-m          Add member",
            "  M-k          Delete item",
            "  M-K          Delete member column under cursor",
            "  M-%          Discount every item",
            "  M-t          Tax every item",
            "  M-f          Toggle percent/fraction shares",
            "",
            "Other:",
            "  M-x          Enter command mode",
            "  C-s          Save",
            "  M-h          This help",
            "  C-q          Quit",
        ]),
        Keymap::Custom(custom) => custom_help_text(custom),
    }
}

/// Get command help text
pub fn get_commands_help() -> Vec<String> {
    lines(&[
        "Commands",
        "",
        "Items and members:",
        "  :item             Add an item",
        "  :member <name>    Add a member column",
        "  :dr               Delete current item",
        "  :dc [name]        Delete a member column",
        "",
        "Whole bill:",
        "  :discount <pct>   Set discount on every item",
        "  :tax <pct>        Set tax on every item",
        "  :mode [percent|fraction]",
        "                    Set or toggle share entry",
        "  :clear            Clear all data",
        "",
        "File:",
        "  :w                Save",
        "  :q                Quit",
        "  :q!               Quit without saving",
        "  :wq               Save and quit",
        "  :export <file>    Export (.csv or Markdown)",
        "",
        "Display:",
        "  :colwidth <n>     Set column width",
        "",
        "Press Esc or q to close",
    ])
}

fn custom_help_text(custom: &CustomKeymap) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if let Some(desc) = custom.description.as_ref() {
        lines.push(desc.clone());
        lines.push(String::new());
    }
    lines.push("Normal:".to_string());
    append_bindings(&mut lines, &custom.bindings.normal);
    lines.push(String::new());
    lines.push("Edit:".to_string());
    append_bindings(&mut lines, &custom.bindings.edit);
    lines.push(String::new());
    lines.push("Command:".to_string());
    append_bindings(&mut lines, &custom.bindings.command);
    lines
}

fn append_bindings(lines: &mut Vec<String>, bindings: &[Binding]) {
    if bindings.is_empty() {
        lines.push("  (no bindings)".to_string());
        return;
    }
    for binding in bindings {
        let label = action_label(&binding.action);
        lines.push(format!("  {:<12} {}", binding.combo.display(), label));
    }
}

fn action_label(action: &Action) -> &'static str {
    match action {
        Action::Cancel => "Cancel",
        Action::EnterEdit => "Edit cell",
        Action::CommitEdit => "Commit edit",
        Action::EnterCommand => "Command mode",
        Action::ExecuteCommand => "Execute command",
        Action::ClearCell => "Clear cell",
        Action::AddItem => "Add item",
        Action::AddMember => "Add member",
        Action::DeleteRow => "Delete item",
        Action::DeleteColumn => "Delete member column",
        Action::GlobalDiscount => "Discount every item",
        Action::GlobalTax => "Tax every item",
        Action::ToggleShareMode => "Toggle share mode",
        Action::ClearData => "Clear all data",
        Action::Help => "Help",
        Action::Move(-1, 0) => "Move left",
        Action::Move(1, 0) => "Move right",
        Action::Move(0, -1) => "Move up",
        Action::Move(0, 1) => "Move down",
        Action::Move(_, _) => "Move",
        Action::Page(-1) => "Page up",
        Action::Page(1) => "Page down",
        Action::Page(_) => "Page",
        Action::HomeCol => "First column",
        Action::EndCol => "Last column",
        Action::GotoFirst => "Go to first item",
        Action::GotoLast => "Go to last item",
        Action::IncColWidth => "Increase column width",
        Action::DecColWidth => "Decrease column width",
        Action::Save => "Save",
        Action::Quit => "Quit",
    }
}
