//! Storefront theme behaviors.
//!
//! # Architecture
//!
//! `Storefront` is the composition root. It owns:
//! - `CartReconciler` - Optimistic line edits over an authoritative cart
//! - `ProductForm` / `Gallery` - Variant selection, quantity and images
//! - `ModalStack` - Open dialogs and where focus returns
//! - `EventRouter` - Element ids registered with typed roles
//! - A `Notifier`, a `GlobalErrorHandler` and a `PreferenceStore`
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use theme_core::prelude::*;
//!
//! let mut storefront = Storefront::builder(ThemeConfig::default(), client, surface)
//!     .notifications(sink)
//!     .build();
//! storefront.register_product("1", EmbeddedVariants::new(product_json));
//! storefront.register_element("add-1", ElementRole::AddToCartForm { product: "1".into() });
//!
//! storefront.start(rendered_cart).await?;
//! storefront.handle(DomEvent::submit("add-1")).await;
//! ```

pub mod cart;
mod app;
mod config;
mod events;
mod gallery;
mod modal;
mod product;

pub use app::*;
pub use config::*;
pub use events::*;
pub use gallery::*;
pub use modal::*;
pub use product::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartReconciler, EditOutcome, ReconcilerOptions};
    pub use crate::{
        DomEvent, ElementRole, Outcome, ProductForm, Storefront, StorefrontBuilder, ThemeConfig,
    };
    pub use theme_client::{CartClient, LineProperties};
    pub use theme_commerce::catalog::EmbeddedVariants;
    pub use theme_commerce::error::ThemeError;
    pub use theme_view::CartSurface;
}
