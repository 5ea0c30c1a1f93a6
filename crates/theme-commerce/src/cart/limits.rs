//! Cart-wide and per-item quantity ceilings.

use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::ids::ItemKey;

/// Default cart-wide ceiling on the sum of quantities.
pub const DEFAULT_MAX_CART_QUANTITY: i64 = 50;

/// Default ceiling on a single line's quantity.
pub const DEFAULT_MAX_ITEM_QUANTITY: i64 = 10;

/// Quantity ceilings enforced before any request leaves the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityLimits {
    pub max_cart_quantity: i64,
    pub max_item_quantity: i64,
}

impl Default for QuantityLimits {
    fn default() -> Self {
        Self {
            max_cart_quantity: DEFAULT_MAX_CART_QUANTITY,
            max_item_quantity: DEFAULT_MAX_ITEM_QUANTITY,
        }
    }
}

impl QuantityLimits {
    pub fn new(max_cart_quantity: i64, max_item_quantity: i64) -> Self {
        Self {
            max_cart_quantity,
            max_item_quantity,
        }
    }

    /// Validate an add quantity and clamp it to the per-item ceiling.
    pub fn clamp_add(&self, quantity: i64) -> Result<i64, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        Ok(quantity.min(self.max_item_quantity))
    }

    /// Reject when `current_total + added` would pass the cart-wide ceiling.
    pub fn check_cart_total(&self, current_total: i64, added: i64) -> Result<(), CartError> {
        let prospective = current_total.saturating_add(added);
        if prospective > self.max_cart_quantity {
            return Err(CartError::QuantityLimit {
                requested: prospective,
                limit: self.max_cart_quantity,
            });
        }
        Ok(())
    }

    /// Reject a line quantity above the per-item ceiling.
    pub fn check_item(&self, key: &ItemKey, quantity: i64) -> Result<(), CartError> {
        if quantity > self.max_item_quantity {
            return Err(CartError::ItemLimitExceeded {
                key: key.clone(),
                limit: self.max_item_quantity,
            });
        }
        Ok(())
    }

    /// Parse a quantity typed into an input field. Empty or non-numeric
    /// input and negatives are invalid; zero is allowed (it means remove).
    pub fn parse_input(&self, raw: &str) -> Result<i64, CartError> {
        match raw.trim().parse::<i64>() {
            Ok(quantity) if quantity >= 0 => Ok(quantity),
            Ok(quantity) => Err(CartError::InvalidQuantity(quantity)),
            Err(_) => Err(CartError::InvalidQuantity(0)),
        }
    }
}
