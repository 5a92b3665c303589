//! Bill state and logic (UI-agnostic).

mod ops;
mod share;
mod state;

pub use share::{SHARE_FRACTIONS, ShareFraction, ShareInputMode};
pub use state::{Bill, DEFAULT_UNITS};
