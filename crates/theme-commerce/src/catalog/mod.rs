//! Product catalog module.
//!
//! Contains the embedded variant data, the shopper's option selection and
//! the resolver that maps one onto the other.

mod resolver;
mod selection;
mod variant;

pub use resolver::{resolve, resolve_embedded};
pub use selection::SelectionState;
pub use variant::{EmbeddedVariants, ProductData, Variant, VariantSet};
