//! splitbill-core - UI-agnostic bill model, persistence and export.

pub mod bill;
pub mod error;
pub mod storage;

pub use bill::{Bill, DEFAULT_UNITS, ShareFraction, ShareInputMode};
pub use error::{Result, SplitError};
pub use storage::{FileStore, KeyValueStore, MemoryStore, Persistence, SavedState};

pub use splitbill_engine::engine::{RemainderPolicy, Row, RowId};
