//! Variants and the embedded product data they are read from.

use std::cell::OnceCell;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{resolve, SelectionState};
use crate::error::ApiError;
use crate::ids::{ProductId, VariantId};
use crate::money::IntoMinorUnits;

/// One purchasable configuration of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawVariant")]
pub struct Variant {
    /// Unique within the product.
    pub id: VariantId,
    /// Display title (e.g., "Large / Blue").
    pub title: Option<String>,
    /// Option values in option order.
    pub options: Vec<String>,
    /// Unit price in minor units.
    pub price_cents: i64,
    /// Original price, when on sale.
    pub compare_at_price_cents: Option<i64>,
    /// Whether the variant can be bought.
    pub available: bool,
    /// Image shown when this variant is selected.
    pub featured_image: Option<String>,
}

impl Variant {
    /// Create an available variant.
    pub fn new(id: VariantId, options: Vec<String>, price_cents: i64) -> Self {
        Self {
            id,
            title: None,
            options,
            price_cents,
            compare_at_price_cents: None,
            available: true,
            featured_image: None,
        }
    }

    /// Check if this variant is on sale.
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price_cents
            .map(|cap| cap > self.price_cents)
            .unwrap_or(false)
    }

    /// Title, or the option values joined when there is none.
    pub fn build_name(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        if self.options.is_empty() {
            "Default".to_string()
        } else {
            self.options.join(" / ")
        }
    }
}

/// Variant as it appears in embedded JSON: option values either as an
/// `options` array or as `option1..option3`, prices as numbers or strings.
#[derive(Deserialize)]
struct RawVariant {
    id: VariantId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    option1: Option<String>,
    #[serde(default)]
    option2: Option<String>,
    #[serde(default)]
    option3: Option<String>,
    #[serde(default, alias = "price_cents")]
    price: Option<serde_json::Value>,
    #[serde(default, alias = "compare_at_price_cents")]
    compare_at_price: Option<serde_json::Value>,
    #[serde(default = "default_available")]
    available: bool,
    #[serde(default)]
    featured_image: Option<RawImage>,
}

fn default_available() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImage {
    Src(String),
    Object { src: String },
}

fn value_to_cents(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().into_minor_units()),
        serde_json::Value::String(s) => s.as_str().into_minor_units(),
        _ => None,
    }
}

impl From<RawVariant> for Variant {
    fn from(raw: RawVariant) -> Self {
        let options = if raw.options.is_empty() {
            [raw.option1, raw.option2, raw.option3]
                .into_iter()
                .map_while(|o| o)
                .collect()
        } else {
            raw.options
        };

        Self {
            id: raw.id,
            title: raw.title,
            options,
            price_cents: raw.price.as_ref().and_then(value_to_cents).unwrap_or(0),
            compare_at_price_cents: raw.compare_at_price.as_ref().and_then(value_to_cents),
            available: raw.available,
            featured_image: raw.featured_image.map(|image| match image {
                RawImage::Src(src) | RawImage::Object { src } => src,
            }),
        }
    }
}

/// Option names arrive either as plain strings or as `{"name": ..}` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOptionName {
    Name(String),
    Object { name: String },
}

fn option_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<RawOptionName> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|o| match o {
            RawOptionName::Name(name) | RawOptionName::Object { name } => name,
        })
        .collect())
}

/// The product blob rendered into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    /// Option names in option order (e.g., ["Size", "Color"]).
    #[serde(default, deserialize_with = "option_names")]
    pub options: Vec<String>,
    pub variants: Vec<Variant>,
    /// Gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductData {
    /// Parse and validate embedded product JSON.
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        let product: ProductData = serde_json::from_str(json)?;
        VariantSet::validate(&product.variants)?;
        Ok(product)
    }

    /// The variant rendered on first paint: the first available one, else
    /// the first one.
    pub fn initial_variant(&self) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.available)
            .or_else(|| self.variants.first())
    }
}

/// A product's variants with unique ids and unique option tuples.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantSet {
    variants: Vec<Variant>,
}

impl VariantSet {
    /// Build a set, rejecting duplicate ids or option tuples.
    pub fn new(variants: Vec<Variant>) -> Result<Self, ApiError> {
        Self::validate(&variants)?;
        Ok(Self { variants })
    }

    fn validate(variants: &[Variant]) -> Result<(), ApiError> {
        let mut ids = HashSet::new();
        let mut tuples = HashSet::new();
        for variant in variants {
            if !ids.insert(&variant.id) {
                return Err(ApiError::Decode(format!(
                    "duplicate variant id {}",
                    variant.id
                )));
            }
            if !tuples.insert(&variant.options) {
                return Err(ApiError::Decode(format!(
                    "duplicate option combination {}",
                    variant.options.join(" / ")
                )));
            }
        }
        Ok(())
    }

    /// Exact-match resolution.
    pub fn resolve(&self, selection: &SelectionState) -> Option<&Variant> {
        resolve(selection, &self.variants)
    }

    /// Look up a variant by id.
    pub fn get(&self, id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    pub fn as_slice(&self) -> &[Variant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Raw embedded product JSON, parsed on first use and cached.
///
/// A blob that fails to parse is remembered as absent; every lookup then
/// answers `None`.
#[derive(Debug, Default)]
pub struct EmbeddedVariants {
    raw: String,
    parsed: OnceCell<Option<ProductData>>,
}

impl EmbeddedVariants {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            parsed: OnceCell::new(),
        }
    }

    /// Wrap already-parsed data.
    pub fn from_product(product: ProductData) -> Self {
        let parsed = OnceCell::new();
        let _ = parsed.set(Some(product));
        Self {
            raw: String::new(),
            parsed,
        }
    }

    /// The parsed product, if the blob is well formed.
    pub fn product(&self) -> Option<&ProductData> {
        self.parsed
            .get_or_init(|| ProductData::from_json(&self.raw).ok())
            .as_ref()
    }

    /// Exact-match resolution; `None` for malformed data.
    pub fn resolve(&self, selection: &SelectionState) -> Option<&Variant> {
        self.product()
            .and_then(|product| resolve(selection, &product.variants))
    }

    /// Look up a variant by id; `None` for malformed data.
    pub fn get(&self, id: &VariantId) -> Option<&Variant> {
        self.product()
            .and_then(|product| product.variants.iter().find(|v| &v.id == id))
    }
}
