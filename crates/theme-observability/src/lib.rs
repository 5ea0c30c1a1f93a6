//! Observability for the theme script layer.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging tagged with the page view
//! - `Notifier` - On-screen notifications mirrored to a live region
//! - `GlobalErrorHandler` - Catches whatever the typed paths missed

mod handler;
mod logging;
mod notify;

pub use handler::*;
pub use logging::*;
pub use notify::*;
