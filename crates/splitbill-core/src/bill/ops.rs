use super::Bill;
use splitbill_engine::engine::{
    self, DISCOUNT_KEY, INITIAL_COLUMNS, Row, RowId, TAX_KEY, column_key,
};
use tracing::debug;

impl Bill {
    /// Append a line item with an empty value for every column.
    pub fn add_row(&mut self) -> RowId {
        let id = Self::fresh_id();
        self.rows.push(Row::new(id.clone(), self.columns.as_slice()));
        self.modified = true;
        debug!(row = %id, "added row");
        id
    }

    /// Remove a line item. Returns false if no row has that id.
    pub fn delete_row(&mut self, id: &RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| &r.id != id);
        let removed = self.rows.len() != before;
        if removed {
            self.modified = true;
            debug!(row = %id, "deleted row");
        }
        removed
    }

    /// Append a column and give every row an empty value under its key.
    ///
    /// Names are not checked for uniqueness.
    pub fn add_column(&mut self, name: &str) {
        let key = column_key(name);
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.insert_key(&key);
        }
        self.modified = true;
        debug!(column = name, key = %key, "added column");
    }

    /// Remove every column with this display name and strip its key from all
    /// rows. Returns false if no column matched.
    pub fn delete_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c != name);
        if self.columns.len() == before {
            return false;
        }
        let key = column_key(name);
        // A differently spelled column may still map to the same key.
        if !self.columns.iter().any(|c| column_key(c) == key) {
            for row in &mut self.rows {
                row.remove(&key);
            }
        }
        self.modified = true;
        debug!(column = name, "deleted column");
        true
    }

    /// Set one cell's raw value. Returns false if the row does not exist.
    pub fn update_row(&mut self, id: &RowId, column: &str, value: &str) -> bool {
        let Some(row) = self.rows.iter_mut().find(|r| &r.id == id) else {
            return false;
        };
        row.set(&column_key(column), value);
        self.modified = true;
        true
    }

    /// Overwrite the discount cell of every row.
    pub fn apply_global_discount(&mut self, pct: &str) {
        self.apply_to_all(DISCOUNT_KEY, pct);
    }

    /// Overwrite the tax cell of every row.
    pub fn apply_global_tax(&mut self, pct: &str) {
        self.apply_to_all(TAX_KEY, pct);
    }

    fn apply_to_all(&mut self, key: &str, value: &str) {
        for row in &mut self.rows {
            row.set(key, value);
        }
        self.modified = true;
        debug!(key, value, rows = self.rows.len(), "applied to all rows");
    }

    /// Drop every row and member column.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns = INITIAL_COLUMNS.iter().map(|c| c.to_string()).collect();
        self.modified = true;
        debug!("cleared bill");
    }

    pub fn calculate_subtotal(&self, row: &Row) -> String {
        engine::subtotal(row)
    }

    pub fn calculate_member_share(&self, row: &Row, column: &str) -> String {
        engine::member_share(row, column)
    }

    pub fn calculate_member_total(&self, column: &str) -> String {
        engine::member_total(&self.rows, column)
    }

    pub fn calculate_total(&self) -> String {
        engine::total(&self.rows)
    }

    pub fn calculate_amount_remaining(&self, row: &Row) -> String {
        engine::amount_remaining(row, self.columns.as_slice(), self.remainder_policy)
    }
}

#[cfg(test)]
mod tests {
    use crate::bill::Bill;
    use splitbill_engine::engine::{RemainderPolicy, parse_amount};

    fn keys_of(bill: &Bill) -> Vec<Vec<String>> {
        bill.rows()
            .iter()
            .map(|r| r.keys().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_new_bill_has_initial_columns() {
        let bill = Bill::new();
        assert_eq!(
            bill.columns(),
            ["Item", "Quantity", "Unit", "Price", "Discount", "Tax", "Sub-Total"]
        );
        assert!(bill.is_empty());
        assert_eq!(bill.member_columns().count(), 0);
    }

    #[test]
    fn test_add_row_has_entry_for_every_column() {
        let mut bill = Bill::new();
        bill.add_column("Alice");
        let id = bill.add_row();
        let row = bill.row(&id).unwrap();
        assert_eq!(row.len(), 8);
        assert!(row.entries().all(|(_, v)| v.is_empty()));
        assert!(bill.modified);
    }

    #[test]
    fn test_add_row_ids_are_unique() {
        let mut bill = Bill::new();
        let a = bill.add_row();
        let b = bill.add_row();
        assert_ne!(a, b);
    }

    #[test]
    fn test_delete_row_missing_is_noop() {
        let mut bill = Bill::new();
        let id = bill.add_row();
        bill.modified = false;
        assert!(!bill.delete_row(&splitbill_engine::engine::RowId::new("nope")));
        assert!(!bill.modified);
        assert!(bill.delete_row(&id));
        assert!(bill.is_empty());
    }

    #[test]
    fn test_add_column_backfills_rows() {
        let mut bill = Bill::new();
        let id = bill.add_row();
        bill.add_column("Mary Ann");
        assert_eq!(bill.row(&id).unwrap().get("maryann"), Some(""));
        assert_eq!(bill.member_columns().collect::<Vec<_>>(), vec!["Mary Ann"]);
    }

    #[test]
    fn test_add_then_delete_column_restores_keys() {
        let mut bill = Bill::new();
        bill.add_row();
        bill.add_row();
        let before = keys_of(&bill);
        bill.add_column("Bob");
        assert_ne!(keys_of(&bill), before);
        assert!(bill.delete_column("Bob"));
        assert_eq!(keys_of(&bill), before);
    }

    #[test]
    fn test_duplicate_column_names_are_allowed() {
        let mut bill = Bill::new();
        bill.add_column("Bob");
        bill.add_column("Bob");
        assert_eq!(bill.member_columns().count(), 2);
        assert!(bill.delete_column("Bob"));
        assert_eq!(bill.member_columns().count(), 0);
        assert!(!bill.delete_column("Bob"));
    }

    #[test]
    fn test_delete_column_keeps_key_shared_by_other_spelling() {
        let mut bill = Bill::new();
        let id = bill.add_row();
        bill.add_column("Ann Lee");
        bill.add_column("AnnLee");
        bill.update_row(&id, "AnnLee", "30");
        assert!(bill.delete_column("Ann Lee"));
        assert_eq!(bill.row(&id).unwrap().get("annlee"), Some("30"));
    }

    #[test]
    fn test_update_row_stores_raw_text() {
        let mut bill = Bill::new();
        let id = bill.add_row();
        assert!(bill.update_row(&id, "Price", "ten"));
        assert_eq!(bill.row(&id).unwrap().value("Price"), "ten");
        assert_eq!(bill.calculate_subtotal(bill.row(&id).unwrap()), "0.00");
        assert!(!bill.update_row(&splitbill_engine::engine::RowId::new("x"), "Price", "1"));
    }

    #[test]
    fn test_global_discount_applies_to_every_row() {
        let mut bill = Bill::new();
        for price in ["10", "20", "30"] {
            let id = bill.add_row();
            bill.update_row(&id, "Quantity", "1");
            bill.update_row(&id, "Price", price);
        }
        bill.apply_global_discount("15");
        for row in bill.rows() {
            assert_eq!(row.value("Discount"), "15");
        }
        let subtotals: Vec<String> = bill
            .rows()
            .iter()
            .map(|r| bill.calculate_subtotal(r))
            .collect();
        assert_eq!(subtotals, vec!["8.50", "17.00", "25.50"]);
        assert_eq!(bill.calculate_total(), "51.00");
    }

    #[test]
    fn test_global_tax_applies_to_every_row() {
        let mut bill = Bill::new();
        let id = bill.add_row();
        bill.update_row(&id, "Quantity", "2");
        bill.update_row(&id, "Price", "10");
        bill.apply_global_tax("5");
        assert_eq!(bill.row(&id).unwrap().value("Tax"), "5");
        assert_eq!(bill.calculate_subtotal(bill.row(&id).unwrap()), "21.00");
    }

    #[test]
    fn test_member_total_matches_sum_of_shares() {
        let mut bill = Bill::new();
        bill.add_column("Alice");
        for (price, pct) in [("9.99", "50"), ("3.10", "33.33"), ("7", "x")] {
            let id = bill.add_row();
            bill.update_row(&id, "Quantity", "1");
            bill.update_row(&id, "Price", price);
            bill.update_row(&id, "Alice", pct);
        }
        let sum: f64 = bill
            .rows()
            .iter()
            .map(|r| parse_amount(&bill.calculate_member_share(r, "Alice")))
            .sum();
        assert_eq!(
            bill.calculate_member_total("Alice"),
            splitbill_engine::engine::to_fixed(sum)
        );
    }

    #[test]
    fn test_amount_remaining_follows_policy() {
        let mut bill = Bill::new();
        bill.add_column("Alice");
        let id = bill.add_row();
        bill.update_row(&id, "Quantity", "1");
        bill.update_row(&id, "Price", "10");
        bill.update_row(&id, "Alice", "150");
        let row = bill.row(&id).unwrap().clone();
        assert_eq!(bill.calculate_amount_remaining(&row), "-5.00");
        bill.remainder_policy = RemainderPolicy::ClampAtZero;
        assert_eq!(bill.calculate_amount_remaining(&row), "0.00");
    }

    #[test]
    fn test_clear_resets_columns_and_rows() {
        let mut bill = Bill::new();
        bill.add_column("Alice");
        bill.add_row();
        bill.clear();
        assert!(bill.is_empty());
        assert_eq!(bill.columns().len(), 7);
    }
}
