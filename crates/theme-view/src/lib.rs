//! Cart view differ.
//!
//! This crate provides:
//! - `diff` - Which rendered lines to remove, refresh in place, or create
//! - `CartSurface` - The rendered cart as the differ sees it
//! - `apply_snapshot` - Applies a diff while keeping node identity
//! - `MemoryCartSurface` - An in-memory surface for tests and tooling
//!
//! Existing line nodes are never rebuilt. They are refreshed in place and,
//! when the order changes, detached and re-appended, so loaded images and
//! transition state survive a reconcile.

mod apply;
mod diff;
mod memory;
mod surface;

pub use apply::*;
pub use diff::*;
pub use memory::*;
pub use surface::*;
