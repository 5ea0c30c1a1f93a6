//! The shopper's current option choices for a product.

use serde::{Deserialize, Serialize};

use crate::catalog::Variant;
use crate::error::FormError;

/// Chosen value per option position.
///
/// Positions are 1-based to match `option1`, `option2`, `option3` in the
/// embedded data. Once built, every declared position always holds
/// exactly one value; `select` replaces, it never clears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    values: Vec<String>,
}

impl SelectionState {
    /// Start from explicit values, one per option position.
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Start from a variant's option tuple (the initially rendered variant).
    pub fn from_variant(variant: &Variant) -> Self {
        Self::new(variant.options.clone())
    }

    /// Choose `value` for option `index` (1-based).
    ///
    /// Returns whether the selection changed.
    pub fn select(&mut self, index: usize, value: impl Into<String>) -> Result<bool, FormError> {
        let slot = index
            .checked_sub(1)
            .and_then(|i| self.values.get_mut(i))
            .ok_or_else(|| FormError::InvalidValue {
                field: format!("option{}", index),
                reason: "no such option".to_string(),
            })?;

        let value = value.into();
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        Ok(true)
    }

    /// The value chosen for option `index` (1-based).
    pub fn value(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// All values in option order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of declared options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
