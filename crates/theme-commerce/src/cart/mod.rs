//! Cart module.
//!
//! Contains line items, authoritative snapshots, quantity ceilings and the
//! ledger of in-flight quantity edits.

mod limits;
mod line_item;
mod pending;
mod snapshot;

pub use limits::{QuantityLimits, DEFAULT_MAX_CART_QUANTITY, DEFAULT_MAX_ITEM_QUANTITY};
pub use line_item::LineItem;
pub use pending::{EditState, EditToken, PendingEdit, PendingEdits};
pub use snapshot::{CartAggregate, CartSnapshot};
