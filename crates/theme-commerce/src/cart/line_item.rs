//! Cart line items as reported by the cart service.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::{ItemKey, VariantId};

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable line key.
    pub key: ItemKey,
    /// Variant being purchased.
    pub variant_id: VariantId,
    /// Quantity, at least 1 while the line exists.
    pub quantity: i64,
    /// Unit price in minor units.
    #[serde(rename = "price")]
    pub price_cents: i64,
    /// Line price in minor units as reported, if reported.
    #[serde(rename = "line_price", default, skip_serializing_if = "Option::is_none")]
    pub line_price_cents: Option<i64>,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Custom line properties (engraving, gift note, ...).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

impl LineItem {
    /// Create a line item.
    pub fn new(
        key: impl Into<ItemKey>,
        variant_id: impl Into<VariantId>,
        quantity: i64,
        price_cents: i64,
        title: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            variant_id: variant_id.into(),
            quantity,
            price_cents,
            line_price_cents: None,
            title: title.into(),
            image: None,
            properties: BTreeMap::new(),
        }
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Line price: the reported one, else unit price times quantity.
    pub fn line_price(&self) -> i64 {
        self.line_price_cents
            .unwrap_or_else(|| self.line_price_for(self.quantity))
    }

    /// Unit price times an arbitrary quantity (for optimistic display).
    pub fn line_price_for(&self, quantity: i64) -> i64 {
        self.price_cents.saturating_mul(quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cart_line() {
        let json = r#"{
            "id": 39872312, "variant_id": 39872312, "key": "39872312:9f1c",
            "quantity": 2, "price": 1500, "line_price": 3000,
            "title": "Canvas Tote - Small", "image": "tote.jpg", "properties": null
        }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.key.as_str(), "39872312:9f1c");
        assert_eq!(item.variant_id.as_str(), "39872312");
        assert_eq!(item.line_price(), 3000);
        assert!(item.properties.is_empty());
    }

    #[test]
    fn test_line_price_derived_when_missing() {
        let item = LineItem::new("k", "v", 3, 1250, "Mug");
        assert_eq!(item.line_price(), 3750);
        assert_eq!(item.line_price_for(1), 1250);
    }
}
