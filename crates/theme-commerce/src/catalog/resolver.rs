//! Variant resolution: selected options to a purchasable variant.

use crate::catalog::{ProductData, SelectionState, Variant};

/// Find the variant whose option tuple equals `selection` exactly.
///
/// No partial matches and no "closest available" substitution: a
/// combination the catalog never generated resolves to `None`.
pub fn resolve<'a>(selection: &SelectionState, variants: &'a [Variant]) -> Option<&'a Variant> {
    variants
        .iter()
        .find(|variant| variant.options.as_slice() == selection.values())
}

/// Resolve against a raw embedded JSON blob.
///
/// Malformed data fails closed: it resolves to `None` rather than an error.
pub fn resolve_embedded(selection: &SelectionState, json: &str) -> Option<Variant> {
    let product = ProductData::from_json(json).ok()?;
    resolve(selection, &product.variants).cloned()
}
