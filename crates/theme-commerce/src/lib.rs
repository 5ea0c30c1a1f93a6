//! Storefront domain types for the theme script layer.
//!
//! This crate is pure: nothing here touches the page or the network.
//!
//! - **Money**: integer minor units and the locale-aware formatter
//! - **Catalog**: variants, the shopper's option selection and the resolver
//! - **Cart**: line items, authoritative snapshots, quantity ceilings and
//!   the ledger of in-flight quantity edits
//! - **Errors**: the `ThemeError` taxonomy shared by every other crate
//!
//! # Example
//!
//! ```rust
//! use theme_commerce::prelude::*;
//!
//! let json = r#"{
//!     "id": 1, "title": "Tee", "options": ["Size"],
//!     "variants": [
//!         {"id": 11, "option1": "Small", "price": 2000, "available": true},
//!         {"id": 12, "option1": "Large", "price": 3000, "available": true}
//!     ]
//! }"#;
//! let product = ProductData::from_json(json).unwrap();
//!
//! let mut selection = SelectionState::from_variant(&product.variants[0]);
//! selection.select(1, "Large").unwrap();
//!
//! let variant = resolve(&selection, &product.variants).unwrap();
//! assert_eq!(format_money(variant.price_cents, "USD", "en-US"), "$30.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;

pub use error::{ApiError, CartError, FormError, ModalError, Severity, ThemeError};
pub use ids::*;
pub use money::{format_money, Currency, IntoMinorUnits, Locale, MoneyFormat};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ApiError, CartError, FormError, ModalError, Severity, ThemeError};
    pub use crate::ids::*;
    pub use crate::money::{format_money, Currency, IntoMinorUnits, Locale, MoneyFormat};

    // Catalog
    pub use crate::catalog::{
        resolve, EmbeddedVariants, ProductData, SelectionState, Variant, VariantSet,
    };

    // Cart
    pub use crate::cart::{
        CartAggregate, CartSnapshot, EditState, EditToken, LineItem, PendingEdit, PendingEdits,
        QuantityLimits, DEFAULT_MAX_CART_QUANTITY, DEFAULT_MAX_ITEM_QUANTITY,
    };
}
