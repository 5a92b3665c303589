//! Line-item rows and column keys.
//!
//! A [`Row`] is an opaque id plus an ordered association from column key to a
//! raw, unvalidated string. Column keys are derived from display names with
//! [`column_key`], so `"Sub-Total"` lives under `"sub-total"` and a member
//! called `"Mary Ann"` lives under `"maryann"`.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Display names of the columns every new bill starts with.
pub const INITIAL_COLUMNS: [&str; 7] = [
    "Item",
    "Quantity",
    "Unit",
    "Price",
    "Discount",
    "Tax",
    "Sub-Total",
];

pub const ITEM_KEY: &str = "item";
pub const QUANTITY_KEY: &str = "quantity";
pub const UNIT_KEY: &str = "unit";
pub const PRICE_KEY: &str = "price";
pub const DISCOUNT_KEY: &str = "discount";
pub const TAX_KEY: &str = "tax";
pub const SUBTOTAL_KEY: &str = "sub-total";

/// Keys of the fixed columns. Every other column is a member column.
pub const RESERVED_KEYS: [&str; 7] = [
    ITEM_KEY,
    QUANTITY_KEY,
    UNIT_KEY,
    PRICE_KEY,
    DISCOUNT_KEY,
    TAX_KEY,
    SUBTOTAL_KEY,
];

/// Name of the serialized id field.
pub const ID_FIELD: &str = "id";

/// Prefix marking an escaped field name in serialized rows.
const FIELD_ESCAPE: char = '~';

/// Derive the storage key for a column display name: lowercase, spaces removed.
pub fn column_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether a key belongs to one of the fixed (non-member) columns.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Whether a column display name denotes a member column.
pub fn is_member_column(name: &str) -> bool {
    !is_reserved_key(&column_key(name))
}

/// Opaque unique row identifier.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        RowId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One billable line item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub id: RowId,
    values: Vec<(String, String)>,
}

impl Row {
    /// Create a row with an empty value for every given column display name.
    pub fn new<S: AsRef<str>>(id: RowId, columns: &[S]) -> Self {
        let mut row = Row {
            id,
            values: Vec::with_capacity(columns.len()),
        };
        for col in columns {
            row.insert_key(&column_key(col.as_ref()));
        }
        row
    }

    /// Create a row from explicit key/value pairs. Later duplicates win.
    pub fn with_values<K, V>(id: RowId, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Row {
            id,
            values: Vec::new(),
        };
        for (k, v) in values {
            row.set(&k.into(), v.into());
        }
        row
    }

    /// Raw value stored under a key, if the key exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Raw value for a column display name; missing keys read as empty.
    pub fn value(&self, column: &str) -> &str {
        self.get(&column_key(column)).unwrap_or("")
    }

    /// Set a key's value, appending the key if it is not present yet.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.values.push((key.to_string(), value)),
        }
    }

    /// Add an empty entry for a key unless one already exists.
    pub fn insert_key(&mut self, key: &str) {
        if !self.contains_key(key) {
            self.values.push((key.to_string(), String::new()));
        }
    }

    /// Remove a key. Returns the old value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.values.iter().position(|(k, _)| k == key)?;
        Some(self.values.remove(idx).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keep only the keys for which `keep` returns true.
    pub fn retain_keys(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.values.retain(|(k, _)| keep(k));
    }
}

/// Field name a value key is written under.
///
/// A column keyed `id` would collide with the row id, so it is written as
/// `~id`; keys that already start with `~` gain one more `~` so the mapping
/// stays reversible.
fn field_name(key: &str) -> Cow<'_, str> {
    if key == ID_FIELD || key.starts_with(FIELD_ESCAPE) {
        Cow::Owned(format!("{}{}", FIELD_ESCAPE, key))
    } else {
        Cow::Borrowed(key)
    }
}

/// Inverse of [`field_name`].
fn key_from_field(field: String) -> String {
    match field.strip_prefix(FIELD_ESCAPE) {
        Some(rest) => rest.to_string(),
        None => field,
    }
}

// Rows serialize as flat objects: {"id": "...", "item": "...", ...}.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(ID_FIELD, self.id.as_str())?;
        for (k, v) in &self.values {
            map.serialize_entry(field_name(k).as_ref(), v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RowVisitor)
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = Row;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a row object with an \"id\" field and string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
        let mut id: Option<String> = None;
        let mut values: Vec<(String, String)> = Vec::new();
        while let Some(key) = access.next_key::<String>()? {
            let value = access.next_value::<Option<String>>()?.unwrap_or_default();
            if key == ID_FIELD {
                id = Some(value);
                continue;
            }
            let key = key_from_field(key);
            if let Some(slot) = values.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                values.push((key, value));
            }
        }
        let id = id.ok_or_else(|| de::Error::missing_field(ID_FIELD))?;
        Ok(Row {
            id: RowId(id),
            values,
        })
    }
}
