//! Storage: key-value persistence of the saved bill and CSV/Markdown export.

pub mod csv;
mod kv;
pub mod md;
mod snapshot;
mod table;

pub use csv::write_csv;
pub use kv::{FileStore, KeyValueStore, MemoryStore, validate_key};
pub use md::write_markdown;
pub use snapshot::{DEFAULT_STORAGE_KEY, Persistence, SavedState};
pub use table::{REMAINING_HEADER, TOTAL_LABEL};
