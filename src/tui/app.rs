//! Application state and logic.
//!
//! [`App`] owns the bill being edited, where it is persisted, the cursor and
//! viewport over the item table, the text buffers for editing and the modal
//! UI state. The app operates in different [`Mode`]s similar to Vim's modal
//! editing.

use super::command::Command;
use super::keymap::Keymap;
use crate::config::Settings;
use crate::export::export_bill;
use splitbill_core::bill::SHARE_FRACTIONS;
use splitbill_core::{Bill, Persistence, Row, RowId, ShareFraction, ShareInputMode};
use splitbill_engine::engine::{
    ID_FIELD, SUBTOTAL_KEY, UNIT_KEY, column_key, is_member_column, is_reserved_key,
};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_COL_WIDTH: usize = 12;
const MIN_COL_WIDTH: usize = 4;
const MAX_COL_WIDTH: usize = 50;

/// What a text prompt is collecting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    MemberName,
    GlobalDiscount,
    GlobalTax,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::MemberName => "Member name",
            PromptKind::GlobalDiscount => "Discount % for all items",
            PromptKind::GlobalTax => "Tax % for all items",
        }
    }
}

/// Modal editing state for the application.
///
/// - [`Normal`](Mode::Normal): Navigate and execute commands
/// - [`Edit`](Mode::Edit): Edit cell contents
/// - [`Command`](Mode::Command): Enter ex-style commands (`:item`, `:q`, etc.)
/// - [`Prompt`](Mode::Prompt): Type a value for a bill-wide action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Edit,
    Command,
    Prompt(PromptKind),
}

/// Choice list for a cell whose values come from a fixed set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picker {
    pub title: String,
    pub row: RowId,
    pub column: String,
    /// `(label, stored value)` pairs.
    pub options: Vec<(String, String)>,
    pub selected: usize,
}

/// Main application state container.
pub struct App {
    /// The bill being edited
    pub bill: Bill,
    /// Where changes are written; `None` when persistence is disabled
    pub persistence: Option<Persistence>,
    /// Symbol printed before amounts
    pub currency: String,
    /// Choices for the Unit column
    pub units: Vec<String>,
    /// How member share cells are entered
    pub share_mode: ShareInputMode,
    /// Current cursor position (column index into the bill's columns)
    pub cursor_col: usize,
    /// Current cursor position (row index into the bill's items)
    pub cursor_row: usize,
    /// Viewport offset (column)
    pub viewport_col: usize,
    /// Viewport offset (row)
    pub viewport_row: usize,
    /// Number of visible columns
    pub visible_cols: usize,
    /// Number of visible rows
    pub visible_rows: usize,
    /// Current mode
    pub mode: Mode,
    /// Edit buffer for cell editing and prompts
    pub edit_buffer: String,
    /// Cursor position within edit buffer (byte offset)
    pub edit_cursor: usize,
    /// Command buffer for command mode
    pub command_buffer: String,
    /// Cursor position within command buffer (byte offset)
    pub command_cursor: usize,
    /// Status message to display
    pub status_message: String,
    /// Column width for display
    pub col_width: usize,
    /// Per-column widths keyed by column name. Default is col_width.
    pub column_widths: HashMap<String, usize>,
    /// Help modal state
    pub help_modal: bool,
    pub help_scroll: usize,
    /// Open value picker, if any
    pub picker: Option<Picker>,
    /// Waiting for y/n before clearing all data
    pub confirm_clear: bool,
    /// Active keymap
    pub keymap: Keymap,
    pub pending_g: bool,
    pub pending_d: bool,
}

impl App {
    /// Create an app over an empty bill with default settings and no persistence.
    pub fn new() -> Self {
        Self::with_bill(Bill::new(), None, &Settings::default(), Keymap::Vim)
    }

    pub fn with_bill(
        mut bill: Bill,
        persistence: Option<Persistence>,
        settings: &Settings,
        keymap: Keymap,
    ) -> Self {
        bill.remainder_policy = settings.remainder;
        App {
            bill,
            persistence,
            currency: settings.currency.clone(),
            units: settings.units.clone(),
            share_mode: settings.share_input,
            cursor_col: 0,
            cursor_row: 0,
            viewport_col: 0,
            viewport_row: 0,
            visible_cols: 8,
            visible_rows: 20,
            mode: Mode::Normal,
            edit_buffer: String::new(),
            edit_cursor: 0,
            command_buffer: String::new(),
            command_cursor: 0,
            status_message: String::new(),
            col_width: DEFAULT_COL_WIDTH,
            column_widths: HashMap::new(),
            help_modal: false,
            help_scroll: 0,
            picker: None,
            confirm_clear: false,
            keymap,
            pending_g: false,
            pending_d: false,
        }
    }

    pub fn row_count(&self) -> usize {
        self.bill.rows().len()
    }

    pub fn col_count(&self) -> usize {
        self.bill.columns().len()
    }

    pub fn current_row(&self) -> Option<&Row> {
        self.bill.row_at(self.cursor_row)
    }

    pub fn current_column(&self) -> Option<&str> {
        self.bill.columns().get(self.cursor_col).map(String::as_str)
    }

    /// Move cursor by delta, clamping to the table.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let max_col = self.col_count().saturating_sub(1) as i64;
        let max_row = self.row_count().saturating_sub(1) as i64;
        self.cursor_col = (self.cursor_col as i64 + dx as i64).clamp(0, max_col) as usize;
        self.cursor_row = (self.cursor_row as i64 + dy as i64).clamp(0, max_row) as usize;
        self.update_viewport();
    }

    fn clamp_cursor(&mut self) {
        self.move_cursor(0, 0);
    }

    /// Update viewport to keep cursor visible
    pub fn update_viewport(&mut self) {
        let visible_cols = self.visible_cols.max(1);
        let visible_rows = self.visible_rows.max(1);

        if self.cursor_col < self.viewport_col {
            self.viewport_col = self.cursor_col;
        } else if self.cursor_col >= self.viewport_col + visible_cols {
            self.viewport_col = self.cursor_col + 1 - visible_cols;
        }

        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + visible_rows {
            self.viewport_row = self.cursor_row + 1 - visible_rows;
        }
    }

    pub fn goto_first(&mut self) {
        self.cursor_row = 0;
        self.update_viewport();
    }

    pub fn goto_last(&mut self) {
        self.cursor_row = self.row_count().saturating_sub(1);
        self.update_viewport();
    }

    pub fn home_col(&mut self) {
        self.cursor_col = 0;
        self.update_viewport();
    }

    pub fn end_col(&mut self) {
        self.cursor_col = self.col_count().saturating_sub(1);
        self.update_viewport();
    }

    /// Target of an edit at the cursor, or a status explaining why there is none.
    fn edit_target(&self) -> Result<(RowId, String), String> {
        let Some(row) = self.current_row() else {
            return Err("No items yet. Add one with :item".to_string());
        };
        let Some(column) = self.current_column() else {
            return Err("No columns".to_string());
        };
        if column_key(column) == SUBTOTAL_KEY {
            return Err("Sub-Total is calculated".to_string());
        }
        Ok((row.id.clone(), column.to_string()))
    }

    /// Edit the current cell, or open its picker.
    pub fn enter_edit_mode(&mut self) {
        let (row_id, column) = match self.edit_target() {
            Ok(target) => target,
            Err(msg) => {
                self.status_message = msg;
                return;
            }
        };
        let current = self.current_row().map(|r| r.value(&column).to_string()).unwrap_or_default();

        if column_key(&column) == UNIT_KEY {
            self.open_unit_picker(row_id, column, &current);
        } else if is_member_column(&column) && self.share_mode == ShareInputMode::Fraction {
            self.open_share_picker(row_id, column, &current);
        } else {
            self.edit_cursor = current.len();
            self.edit_buffer = current;
            self.mode = Mode::Edit;
        }
    }

    fn open_unit_picker(&mut self, row: RowId, column: String, current: &str) {
        let options: Vec<(String, String)> =
            self.units.iter().map(|u| (u.clone(), u.clone())).collect();
        let selected = options.iter().position(|(_, v)| v == current).unwrap_or(0);
        self.picker = Some(Picker {
            title: "Unit".to_string(),
            row,
            column,
            options,
            selected,
        });
    }

    fn open_share_picker(&mut self, row: RowId, column: String, current: &str) {
        let options = SHARE_FRACTIONS
            .iter()
            .map(|f| (f.label.to_string(), f.percent.to_string()))
            .collect();
        let selected = ShareFraction::index_of(current).unwrap_or(0);
        self.picker = Some(Picker {
            title: format!("{} share", column),
            row,
            column,
            options,
            selected,
        });
    }

    pub fn picker_move(&mut self, delta: i32) {
        if let Some(picker) = self.picker.as_mut() {
            let max = picker.options.len().saturating_sub(1) as i64;
            picker.selected = (picker.selected as i64 + delta as i64).clamp(0, max) as usize;
        }
    }

    pub fn picker_commit(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let Some((label, value)) = picker.options.get(picker.selected) else {
            return;
        };
        if self.bill.update_row(&picker.row, &picker.column, value) {
            self.status_message = format!("{} set to {}", picker.column, label);
            self.persist();
        }
    }

    pub fn picker_cancel(&mut self) {
        self.picker = None;
    }

    /// Commit the current edit or prompt and return to Normal mode.
    pub fn commit_edit(&mut self) {
        let value = std::mem::take(&mut self.edit_buffer);
        self.edit_cursor = 0;
        let mode = self.mode;
        self.mode = Mode::Normal;

        match mode {
            Mode::Edit => {
                let (row_id, column) = match self.edit_target() {
                    Ok(target) => target,
                    Err(msg) => {
                        self.status_message = msg;
                        return;
                    }
                };
                if self.bill.update_row(&row_id, &column, &value) {
                    self.status_message.clear();
                    self.persist();
                }
            }
            Mode::Prompt(PromptKind::MemberName) => self.add_member(&value),
            Mode::Prompt(PromptKind::GlobalDiscount) => self.apply_discount(&value),
            Mode::Prompt(PromptKind::GlobalTax) => self.apply_tax(&value),
            Mode::Normal | Mode::Command => {}
        }
    }

    /// Leave Edit, Command or Prompt mode without applying anything.
    pub fn cancel(&mut self) {
        match self.mode {
            Mode::Edit | Mode::Prompt(_) => {
                self.edit_buffer.clear();
                self.edit_cursor = 0;
            }
            Mode::Command => {
                self.command_buffer.clear();
                self.command_cursor = 0;
            }
            Mode::Normal => {}
        }
        self.mode = Mode::Normal;
    }

    pub fn start_prompt(&mut self, kind: PromptKind) {
        self.edit_buffer.clear();
        self.edit_cursor = 0;
        self.mode = Mode::Prompt(kind);
    }

    pub fn clear_current_cell(&mut self) {
        let (row_id, column) = match self.edit_target() {
            Ok(target) => target,
            Err(msg) => {
                self.status_message = msg;
                return;
            }
        };
        let is_empty = self.current_row().is_some_and(|r| r.value(&column).is_empty());
        if !is_empty && self.bill.update_row(&row_id, &column, "") {
            self.persist();
        }
    }

    pub fn add_item(&mut self) {
        self.bill.add_row();
        self.cursor_row = self.row_count().saturating_sub(1);
        self.cursor_col = 0;
        self.update_viewport();
        self.status_message = format!("Added item {}", self.row_count());
        self.persist();
    }

    pub fn add_member(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.status_message = "Error: member name is empty".to_string();
            return;
        }
        let key = column_key(name);
        if is_reserved_key(&key) || key == ID_FIELD {
            self.status_message = format!("Error: '{}' is a reserved column name", name);
            return;
        }
        if self.bill.columns().iter().any(|c| column_key(c) == key) {
            self.status_message = format!("Error: column '{}' already exists", name);
            return;
        }
        self.bill.add_column(name);
        self.status_message = format!("Added member {}", name);
        self.persist();
    }

    pub fn delete_current_row(&mut self) {
        let Some(id) = self.current_row().map(|r| r.id.clone()) else {
            self.status_message = "No item to delete".to_string();
            return;
        };
        if self.bill.delete_row(&id) {
            self.clamp_cursor();
            self.status_message = "Deleted item".to_string();
            self.persist();
        }
    }

    /// Delete the named column, or the one under the cursor.
    pub fn delete_column(&mut self, name: Option<&str>) {
        let name = match name.or(self.current_column()) {
            Some(name) => name.to_string(),
            None => {
                self.status_message = "No column to delete".to_string();
                return;
            }
        };
        if self.bill.delete_column(&name) {
            self.column_widths.remove(&name);
            self.clamp_cursor();
            self.status_message = format!("Deleted column {}", name);
            self.persist();
        } else {
            self.status_message = format!("Error: no column named '{}'", name);
        }
    }

    pub fn apply_discount(&mut self, pct: &str) {
        let pct = pct.trim();
        self.bill.apply_global_discount(pct);
        self.status_message = format!("Discount {}% applied to all items", pct);
        self.persist();
    }

    pub fn apply_tax(&mut self, pct: &str) {
        let pct = pct.trim();
        self.bill.apply_global_tax(pct);
        self.status_message = format!("Tax {}% applied to all items", pct);
        self.persist();
    }

    pub fn set_share_mode(&mut self, mode: ShareInputMode) {
        self.share_mode = mode;
        self.status_message = format!("Share input: {}", mode);
    }

    pub fn toggle_share_mode(&mut self) {
        self.set_share_mode(self.share_mode.toggle());
    }

    pub fn request_clear_data(&mut self) {
        self.confirm_clear = true;
        self.status_message = "Clear all data? This cannot be undone. (y/n)".to_string();
    }

    /// Answer the clear-data confirmation.
    pub fn confirm_clear_data(&mut self, yes: bool) {
        self.confirm_clear = false;
        if !yes {
            self.status_message = "Clear cancelled".to_string();
            return;
        }
        self.bill.clear();
        self.column_widths.clear();
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.viewport_row = 0;
        self.viewport_col = 0;
        self.status_message = "All data cleared".to_string();
        if let Some(persistence) = self.persistence.as_mut() {
            match persistence.clear() {
                Ok(()) => self.bill.modified = false,
                Err(e) => {
                    warn!(error = %e, "failed to clear saved bill");
                    self.status_message = format!("Error clearing saved data: {}", e);
                }
            }
        }
    }

    /// Write pending changes. Failures leave the bill marked modified so the
    /// next change retries.
    fn persist(&mut self) {
        let Some(persistence) = self.persistence.as_mut() else {
            return;
        };
        if let Err(e) = persistence.save_if_modified(&mut self.bill) {
            warn!(error = %e, "failed to save bill");
            self.status_message = format!("Error saving: {}", e);
        }
    }

    /// Explicit save. Returns false if the bill could not be written.
    pub fn save(&mut self) -> bool {
        let Some(persistence) = self.persistence.as_mut() else {
            self.status_message = "Persistence is disabled".to_string();
            return true;
        };
        match persistence.save(&mut self.bill) {
            Ok(()) => {
                self.status_message = format!("Saved to '{}'", persistence.key());
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to save bill");
                self.status_message = format!("Error saving: {}", e);
                false
            }
        }
    }

    /// Whether there are changes that could not be written.
    pub fn has_unsaved_changes(&self) -> bool {
        self.persistence.is_some() && self.bill.modified
    }

    pub fn export(&mut self, path: &Path) {
        match export_bill(path, &self.bill, &self.currency) {
            Ok(format) => {
                self.status_message = format!("Exported {} to {}", format.name(), path.display());
            }
            Err(e) => {
                self.status_message = format!("Export error: {:#}", e);
            }
        }
    }

    /// Get width for a specific column
    pub fn get_column_width(&self, col: usize) -> usize {
        self.bill
            .columns()
            .get(col)
            .and_then(|name| self.column_widths.get(name))
            .copied()
            .unwrap_or(self.col_width)
    }

    /// Set width for current column
    pub fn set_column_width(&mut self, width: usize) {
        let width = width.clamp(MIN_COL_WIDTH, MAX_COL_WIDTH);
        if let Some(name) = self.current_column().map(str::to_string) {
            self.column_widths.insert(name, width);
        }
    }

    pub fn increase_column_width(&mut self) {
        let current = self.get_column_width(self.cursor_col);
        self.set_column_width(current + 2);
    }

    pub fn decrease_column_width(&mut self) {
        let current = self.get_column_width(self.cursor_col);
        self.set_column_width(current.saturating_sub(2));
    }

    pub fn open_help(&mut self) {
        self.help_modal = true;
        self.help_scroll = 0;
    }

    pub fn close_help_modal(&mut self) {
        self.help_modal = false;
    }

    pub fn scroll_help_by(&mut self, delta: i32) {
        self.help_scroll = if delta < 0 {
            self.help_scroll.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.help_scroll.saturating_add(delta as usize)
        };
    }

    pub fn scroll_help_to_top(&mut self) {
        self.help_scroll = 0;
    }

    /// Rendering clamps this to the last page.
    pub fn scroll_help_to_end(&mut self) {
        self.help_scroll = usize::MAX;
    }

    /// Text shown for a cell in the table.
    pub fn cell_display(&self, row: &Row, column: &str) -> String {
        if column_key(column) == SUBTOTAL_KEY {
            return self.bill.calculate_subtotal(row);
        }
        let raw = row.value(column);
        if column_key(column) == UNIT_KEY && raw.trim().is_empty() {
            return "ea".to_string();
        }
        if is_member_column(column) && !raw.trim().is_empty() {
            let share = self.bill.calculate_member_share(row, column);
            let entered = match self.share_mode {
                ShareInputMode::Fraction => ShareFraction::matching(raw)
                    .map(|f| f.label.to_string())
                    .unwrap_or_else(|| format!("{}%", raw.trim())),
                ShareInputMode::Percent => format!("{}%", raw.trim()),
            };
            return format!("{} {}", entered, share);
        }
        raw.to_string()
    }

    /// Execute a command entered in command mode.
    ///
    /// Returns `true` if the application should quit, `false` otherwise.
    pub fn execute_command(&mut self) -> bool {
        let input = std::mem::take(&mut self.command_buffer);
        self.command_cursor = 0;
        self.mode = Mode::Normal;

        let command = match Command::parse(&input) {
            Ok(Some(command)) => command,
            Ok(None) => return false,
            Err(e) => {
                self.status_message = format!("Error: {}", e);
                return false;
            }
        };
        info!(?command, "command");

        match command {
            Command::AddItem => self.add_item(),
            Command::AddMember(name) => self.add_member(&name),
            Command::DeleteRow => self.delete_current_row(),
            Command::DeleteColumn(name) => self.delete_column(name.as_deref()),
            Command::Discount(pct) => self.apply_discount(&pct),
            Command::Tax(pct) => self.apply_tax(&pct),
            Command::ShareMode(Some(mode)) => self.set_share_mode(mode),
            Command::ShareMode(None) => self.toggle_share_mode(),
            Command::ClearData => self.request_clear_data(),
            Command::Export(path) => self.export(&path),
            Command::ColumnWidth(width) => {
                self.set_column_width(width);
                self.status_message =
                    format!("Column width set to {}", self.get_column_width(self.cursor_col));
            }
            Command::Write => {
                self.save();
            }
            Command::Quit { force } => {
                self.persist();
                if !force && self.has_unsaved_changes() {
                    self.status_message =
                        "Unsaved changes! Use :q! to quit anyway or :w to retry".to_string();
                    return false;
                }
                return true;
            }
            Command::WriteQuit => return self.save(),
            Command::Help => self.open_help(),
        }
        false
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitbill_core::{KeyValueStore, MemoryStore};

    fn app_with_item() -> App {
        let mut app = App::new();
        app.add_member("Alice");
        app.add_item();
        app
    }

    fn run(app: &mut App, command: &str) -> bool {
        app.command_buffer = command.to_string();
        app.mode = Mode::Command;
        app.execute_command()
    }

    fn type_into_cell(app: &mut App, column: usize, text: &str) {
        app.cursor_col = column;
        app.enter_edit_mode();
        assert_eq!(app.mode, Mode::Edit);
        app.edit_buffer = text.to_string();
        app.commit_edit();
    }

    /// Store handle that stays inspectable after being boxed into the app.
    #[derive(Clone, Default)]
    struct SharedStore(std::rc::Rc<std::cell::RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> splitbill_core::Result<Option<String>> {
            self.0.borrow().get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> splitbill_core::Result<()> {
            self.0.borrow_mut().set(key, value)
        }
        fn remove(&mut self, key: &str) -> splitbill_core::Result<()> {
            self.0.borrow_mut().remove(key)
        }
    }

    fn persisted_app() -> (App, SharedStore) {
        let store = SharedStore::default();
        let persistence = Persistence::new(Box::new(store.clone()), "bill");
        let app = App::with_bill(Bill::new(), Some(persistence), &Settings::default(), Keymap::Vim);
        (app, store)
    }

    #[test]
    fn editing_cells_updates_subtotal_and_share() {
        let mut app = app_with_item();
        type_into_cell(&mut app, 1, "2");
        type_into_cell(&mut app, 3, "10");
        type_into_cell(&mut app, 4, "10");
        type_into_cell(&mut app, 5, "5");
        type_into_cell(&mut app, 7, "50");

        let row = app.current_row().unwrap().clone();
        assert_eq!(app.cell_display(&row, "Sub-Total"), "19.00");
        assert_eq!(app.cell_display(&row, "Alice"), "50% 9.50");
        assert_eq!(app.bill.calculate_amount_remaining(&row), "9.50");
    }

    #[test]
    fn subtotal_is_not_editable() {
        let mut app = app_with_item();
        app.cursor_col = 6;
        app.enter_edit_mode();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.status_message, "Sub-Total is calculated");
    }

    #[test]
    fn edit_without_items_explains() {
        let mut app = App::new();
        app.enter_edit_mode();
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.status_message.contains("No items"));
    }

    #[test]
    fn unit_cell_opens_picker_and_empty_shows_ea() {
        let mut app = app_with_item();
        let row = app.current_row().unwrap().clone();
        assert_eq!(app.cell_display(&row, "Unit"), "ea");

        app.cursor_col = 2;
        app.enter_edit_mode();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.picker.as_ref().unwrap().options.len(), 5);
        app.picker_move(2);
        app.picker_commit();
        assert!(app.picker.is_none());
        assert_eq!(app.current_row().unwrap().value("Unit"), "lb");
    }

    #[test]
    fn fraction_mode_picks_preset_percentages() {
        let mut app = app_with_item();
        type_into_cell(&mut app, 1, "1");
        type_into_cell(&mut app, 3, "12");
        app.toggle_share_mode();
        assert_eq!(app.share_mode, ShareInputMode::Fraction);

        app.cursor_col = 7;
        app.enter_edit_mode();
        app.picker_move(3);
        app.picker_commit();
        let row = app.current_row().unwrap().clone();
        assert_eq!(row.value("Alice"), "50");
        assert_eq!(app.cell_display(&row, "Alice"), "1/2 6.00");

        app.enter_edit_mode();
        assert_eq!(app.picker.as_ref().unwrap().selected, 3);
        app.picker_cancel();
        assert_eq!(app.current_row().unwrap().value("Alice"), "50");
    }

    #[test]
    fn member_prompt_adds_column() {
        let mut app = App::new();
        app.start_prompt(PromptKind::MemberName);
        app.edit_buffer = "  Bob ".to_string();
        app.commit_edit();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.bill.columns().last().map(String::as_str), Some("Bob"));

        app.add_member("bob");
        assert!(app.status_message.starts_with("Error"));
        app.add_member("price");
        assert!(app.status_message.starts_with("Error"));
        assert_eq!(app.col_count(), 8);
    }

    #[test]
    fn member_named_like_row_id_is_refused() {
        let mut app = App::new();
        for name in ["Id", "I d", "ID"] {
            app.add_member(name);
            assert!(app.status_message.contains("reserved"), "{}", app.status_message);
        }
        app.add_member("Ida");
        assert_eq!(app.bill.columns().last().map(String::as_str), Some("Ida"));
    }

    #[test]
    fn global_prompts_apply_to_every_row() {
        let mut app = app_with_item();
        app.add_item();
        app.start_prompt(PromptKind::GlobalDiscount);
        app.edit_buffer = "15".to_string();
        app.commit_edit();
        app.start_prompt(PromptKind::GlobalTax);
        app.edit_buffer = "8".to_string();
        app.commit_edit();
        for row in app.bill.rows() {
            assert_eq!(row.value("Discount"), "15");
            assert_eq!(row.value("Tax"), "8");
        }
    }

    #[test]
    fn cancel_discards_prompt() {
        let mut app = app_with_item();
        app.start_prompt(PromptKind::GlobalTax);
        app.edit_buffer = "99".to_string();
        app.cancel();
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.edit_buffer.is_empty());
        assert_eq!(app.current_row().unwrap().value("Tax"), "");
    }

    #[test]
    fn delete_row_and_column_clamp_cursor() {
        let mut app = app_with_item();
        app.add_item();
        assert_eq!(app.cursor_row, 1);
        app.delete_current_row();
        assert_eq!(app.row_count(), 1);
        assert_eq!(app.cursor_row, 0);

        app.end_col();
        assert_eq!(app.current_column(), Some("Alice"));
        app.delete_column(None);
        assert_eq!(app.col_count(), 7);
        assert_eq!(app.cursor_col, 6);

        app.delete_column(Some("Nobody"));
        assert!(app.status_message.starts_with("Error"));
    }

    #[test]
    fn move_cursor_stays_inside_table() {
        let mut app = app_with_item();
        app.move_cursor(-5, -5);
        assert_eq!((app.cursor_col, app.cursor_row), (0, 0));
        app.move_cursor(100, 100);
        assert_eq!((app.cursor_col, app.cursor_row), (7, 0));
    }

    #[test]
    fn changes_are_saved_as_they_happen() {
        let (mut app, store) = persisted_app();
        app.add_member("Alice");
        app.add_item();
        type_into_cell(&mut app, 3, "4");
        assert!(!app.bill.modified);

        let saved = store.get("bill").unwrap().expect("saved bill");
        assert!(saved.contains(r#""price":"4""#));
        assert!(saved.contains(r#""Alice""#));
    }

    #[test]
    fn clear_requires_confirmation() {
        let (mut app, store) = persisted_app();
        app.add_item();
        assert!(!run(&mut app, "clear"));
        assert!(app.confirm_clear);

        app.confirm_clear_data(false);
        assert_eq!(app.row_count(), 1);
        assert!(store.get("bill").unwrap().is_some());

        app.request_clear_data();
        app.confirm_clear_data(true);
        assert_eq!(app.row_count(), 0);
        assert_eq!(app.col_count(), 7);
        assert!(store.get("bill").unwrap().is_none());
    }

    #[test]
    fn commands_drive_the_bill() {
        let mut app = App::new();
        run(&mut app, "member Carol");
        run(&mut app, "item");
        run(&mut app, "discount 10");
        run(&mut app, "mode fraction");
        assert_eq!(app.share_mode, ShareInputMode::Fraction);
        run(&mut app, "mode");
        assert_eq!(app.share_mode, ShareInputMode::Percent);
        assert_eq!(app.current_row().unwrap().value("Discount"), "10");
        run(&mut app, "delcol Carol");
        assert_eq!(app.col_count(), 7);
        run(&mut app, "bogus");
        assert_eq!(app.status_message, "Error: Unknown command: bogus");
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn quit_without_persistence() {
        let mut app = app_with_item();
        assert!(run(&mut app, "q"));
        assert!(run(&mut app, "wq"));
    }

    #[test]
    fn export_command_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut app = app_with_item();
        run(&mut app, &format!("export {}", path.display()));
        assert!(app.status_message.starts_with("Exported CSV"));
        assert!(path.exists());
    }

    #[test]
    fn column_width_is_tracked_by_name() {
        let mut app = app_with_item();
        app.cursor_col = 7;
        app.increase_column_width();
        assert_eq!(app.get_column_width(7), DEFAULT_COL_WIDTH + 2);
        app.set_column_width(1000);
        assert_eq!(app.get_column_width(7), MAX_COL_WIDTH);
        app.delete_column(Some("Alice"));
        app.add_member("Alice");
        assert_eq!(app.get_column_width(7), DEFAULT_COL_WIDTH);
    }
}
