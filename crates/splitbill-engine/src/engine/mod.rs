//! Bill calculation API.
//!
//! - [`Row`], [`RowId`] - Line items and their raw cell values
//! - [`column_key`] - Column display name to storage key
//! - [`parse_amount`], [`to_fixed`] - Lenient number reading and 2-decimal display
//! - [`subtotal`], [`member_share`], [`member_total`], [`total`],
//!   [`amount_remaining`] - Derived amounts

mod amount;
mod calc;
mod row;

pub use amount::{parse_amount, round_cents, to_fixed};
pub use calc::{RemainderPolicy, amount_remaining, member_share, member_total, subtotal, total};
pub use row::{
    DISCOUNT_KEY, ID_FIELD, INITIAL_COLUMNS, ITEM_KEY, PRICE_KEY, QUANTITY_KEY, RESERVED_KEYS,
    Row, RowId, SUBTOTAL_KEY, TAX_KEY, UNIT_KEY, column_key, is_member_column, is_reserved_key,
};
