use crate::storage::SavedState;
use splitbill_engine::engine::{
    INITIAL_COLUMNS, RemainderPolicy, Row, RowId, column_key, is_member_column,
};
use std::collections::HashSet;

/// Units offered for the Unit column when no settings override them.
pub const DEFAULT_UNITS: [&str; 5] = ["kg", "g", "lb", "oz", "ea"];

/// UI-agnostic bill state: ordered line items and ordered column names.
///
/// Every row holds an entry for every column key; the mutation methods in
/// this module keep that true.
#[derive(Clone, Debug)]
pub struct Bill {
    /// Line items, in display order
    pub(crate) rows: Vec<Row>,
    /// Column display names, in display order
    pub(crate) columns: Vec<String>,
    /// How over-allocated rows report their remainder
    pub remainder_policy: RemainderPolicy,
    /// Whether rows or columns changed since the last save
    pub modified: bool,
}

impl Bill {
    /// Create an empty bill with the initial columns.
    pub fn new() -> Self {
        Bill {
            rows: Vec::new(),
            columns: INITIAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            remainder_policy: RemainderPolicy::default(),
            modified: false,
        }
    }

    /// Restore a bill from a saved snapshot.
    ///
    /// Rows are normalized to the saved columns: missing keys are added empty,
    /// keys with no column are dropped, and rows with an empty or repeated id
    /// get a fresh one. A snapshot without columns gets the initial columns.
    pub fn from_snapshot(saved: SavedState) -> Self {
        let columns = if saved.saved_columns.is_empty() {
            INITIAL_COLUMNS.iter().map(|c| c.to_string()).collect()
        } else {
            saved.saved_columns
        };
        let keys: Vec<String> = columns.iter().map(|c| column_key(c)).collect();
        let mut seen: HashSet<RowId> = HashSet::new();

        let rows = saved
            .saved_rows
            .into_iter()
            .map(|mut row| {
                if row.id.as_str().is_empty() || seen.contains(&row.id) {
                    row.id = Self::fresh_id();
                }
                seen.insert(row.id.clone());
                row.retain_keys(|k| keys.iter().any(|key| key == k));
                for key in &keys {
                    row.insert_key(key);
                }
                row
            })
            .collect();

        Bill {
            rows,
            columns,
            remainder_policy: RemainderPolicy::default(),
            modified: false,
        }
    }

    /// Owned copy of the rows and columns.
    pub fn snapshot(&self) -> SavedState {
        SavedState {
            saved_rows: self.rows.clone(),
            saved_columns: self.columns.clone(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| &r.id == id)
    }

    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Columns representing people sharing costs, in display order.
    pub fn member_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| is_member_column(c))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn fresh_id() -> RowId {
        RowId::new(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for Bill {
    fn default() -> Self {
        Self::new()
    }
}
