//! The saved bill and the adapter that mirrors it into a [`KeyValueStore`].

use super::kv::KeyValueStore;
use crate::bill::Bill;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use splitbill_engine::engine::Row;
use tracing::{debug, info};

/// Key the bill is stored under unless settings say otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "split-bill";

/// Serialized form: `{"savedRows": [...], "savedColumns": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    #[serde(default)]
    pub saved_rows: Vec<Row>,
    #[serde(default)]
    pub saved_columns: Vec<String>,
}

impl SavedState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Mirrors a [`Bill`] into one key of a store.
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Persistence {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the saved bill. `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<Bill>> {
        let Some(json) = self.store.get(&self.key)? else {
            debug!(key = %self.key, "no saved bill");
            return Ok(None);
        };
        let saved = SavedState::from_json(&json)?;
        info!(
            key = %self.key,
            rows = saved.saved_rows.len(),
            columns = saved.saved_columns.len(),
            "loaded saved bill"
        );
        Ok(Some(Bill::from_snapshot(saved)))
    }

    /// Write the bill and clear its modified flag.
    pub fn save(&mut self, bill: &mut Bill) -> Result<()> {
        let json = bill.snapshot().to_json()?;
        self.store.set(&self.key, &json)?;
        bill.modified = false;
        debug!(key = %self.key, bytes = json.len(), "saved bill");
        Ok(())
    }

    /// Save only if something changed since the last save.
    pub fn save_if_modified(&mut self, bill: &mut Bill) -> Result<bool> {
        if !bill.modified {
            return Ok(false);
        }
        self.save(bill)?;
        Ok(true)
    }

    /// Remove the saved bill.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(&self.key)?;
        info!(key = %self.key, "cleared saved bill");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    fn sample_bill() -> Bill {
        let mut bill = Bill::new();
        bill.add_column("Alice");
        let id = bill.add_row();
        bill.update_row(&id, "Item", "Pizza");
        bill.update_row(&id, "Quantity", "2");
        bill.update_row(&id, "Price", "12.5");
        bill.update_row(&id, "Alice", "50");
        bill
    }

    #[test]
    fn test_saved_state_json_shape() {
        let bill = sample_bill();
        let json = bill.snapshot().to_json().unwrap();
        assert!(json.starts_with(r#"{"savedRows":[{"id":""#));
        assert!(json.contains(r#""item":"Pizza""#));
        assert!(json.ends_with(
            r#""savedColumns":["Item","Quantity","Unit","Price","Discount","Tax","Sub-Total","Alice"]}"#
        ));
    }

    #[test]
    fn test_save_then_load_restores_bill() {
        let mut persistence = Persistence::new(Box::new(MemoryStore::new()), "bill");
        let mut bill = sample_bill();
        persistence.save(&mut bill).unwrap();
        assert!(!bill.modified);

        let loaded = persistence.load().unwrap().unwrap();
        assert_eq!(loaded.snapshot(), bill.snapshot());
        assert_eq!(loaded.calculate_total(), "25.00");
        assert!(!loaded.modified);
    }

    #[test]
    fn test_member_keyed_id_survives_save_and_load() {
        let mut persistence = Persistence::new(Box::new(MemoryStore::new()), "bill");
        let mut bill = Bill::new();
        bill.add_column("Id");
        let id = bill.add_row();
        bill.update_row(&id, "Quantity", "1");
        bill.update_row(&id, "Price", "10");
        bill.update_row(&id, "Id", "50");
        let row = bill.row_at(0).unwrap();
        assert_eq!(bill.calculate_member_share(row, "Id"), "5.00");
        persistence.save(&mut bill).unwrap();

        let loaded = persistence.load().unwrap().unwrap();
        let row = loaded.row_at(0).unwrap();
        assert_eq!(row.id, id);
        assert_eq!(loaded.calculate_member_share(row, "Id"), "5.00");
        assert_eq!(loaded.calculate_member_total("Id"), "5.00");
        assert_eq!(loaded.snapshot(), bill.snapshot());
    }

    #[test]
    fn test_load_without_columns_restores_initial_columns() {
        let mut store = MemoryStore::new();
        store
            .set("bill", r#"{"savedRows": [{"id": "a", "item": "Tea", "price": "3"}]}"#)
            .unwrap();
        let bill = Persistence::new(Box::new(store), "bill")
            .load()
            .unwrap()
            .unwrap();

        assert_eq!(bill.columns(), Bill::new().columns());
        let row = bill.row_at(0).unwrap();
        assert_eq!(row.value("Item"), "Tea");
        assert_eq!(row.value("Price"), "3");
        assert_eq!(row.len(), bill.columns().len());
    }

    #[test]
    fn test_load_missing_is_none() {
        let persistence = Persistence::new(Box::new(MemoryStore::new()), "bill");
        assert!(persistence.load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_is_json_error() {
        let mut store = MemoryStore::new();
        store.set("bill", "{not json").unwrap();
        let persistence = Persistence::new(Box::new(store), "bill");
        assert!(matches!(
            persistence.load(),
            Err(crate::error::SplitError::Json(_))
        ));
    }

    #[test]
    fn test_load_normalizes_rows_to_columns() {
        let json = r#"{
            "savedRows": [
                {"id": "a", "item": "Tea", "stale": "x"},
                {"id": "a", "item": "Cake"}
            ],
            "savedColumns": ["Item", "Price", "Bob"]
        }"#;
        let mut store = MemoryStore::new();
        store.set("bill", json).unwrap();
        let bill = Persistence::new(Box::new(store), "bill")
            .load()
            .unwrap()
            .unwrap();

        let first = bill.row_at(0).unwrap();
        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["item", "price", "bob"]);
        assert_eq!(first.value("Item"), "Tea");
        let second = bill.row_at(1).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_save_if_modified_skips_clean_bill() {
        let mut persistence = Persistence::new(Box::new(MemoryStore::new()), "bill");
        let mut bill = Bill::new();
        assert!(!persistence.save_if_modified(&mut bill).unwrap());
        assert!(persistence.load().unwrap().is_none());
        bill.add_row();
        assert!(persistence.save_if_modified(&mut bill).unwrap());
        assert!(persistence.load().unwrap().is_some());
    }

    #[test]
    fn test_clear_removes_saved_bill_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let mut persistence = Persistence::new(Box::new(FileStore::new(tmp.path())), "bill");
        let mut bill = sample_bill();
        persistence.save(&mut bill).unwrap();
        assert!(tmp.path().join("bill").exists());
        persistence.clear().unwrap();
        assert!(!tmp.path().join("bill").exists());
        assert!(persistence.load().unwrap().is_none());
    }
}
