//! Authoritative cart state and the aggregate derived from it.

use serde::{Deserialize, Serialize};

use crate::cart::LineItem;
use crate::ids::ItemKey;

/// The full line-item list as last reported by the cart service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Cart token, when the service reports one.
    #[serde(default)]
    pub token: Option<String>,
    /// Lines in display order.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Currency code of the cart.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Item count and total price, always derived from a line-item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartAggregate {
    /// Sum of quantities.
    pub item_count: i64,
    /// Sum of line prices in minor units.
    pub total_cents: i64,
}

impl CartSnapshot {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self {
            token: None,
            items,
            currency: None,
        }
    }

    /// Drop lines that carry a zero or negative quantity; such lines are
    /// removals, never persisted lines.
    pub fn normalized(mut self) -> Self {
        self.items.retain(|item| item.quantity > 0);
        self
    }

    /// Recompute count and total from the lines.
    pub fn aggregate(&self) -> CartAggregate {
        self.items.iter().fold(CartAggregate::default(), |acc, item| CartAggregate {
            item_count: acc.item_count.saturating_add(item.quantity),
            total_cents: acc.total_cents.saturating_add(item.line_price()),
        })
    }

    /// Find a line by key.
    pub fn get(&self, key: &ItemKey) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.key == key)
    }

    /// 1-based line number, the address the cart service uses for updates.
    pub fn line_number(&self, key: &ItemKey) -> Option<usize> {
        self.items
            .iter()
            .position(|item| &item.key == key)
            .map(|index| index + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
