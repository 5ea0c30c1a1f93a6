//! Cart service contract.
//!
//! This crate provides:
//! - `CartClient` - Add / update / remove lines, each answered with the
//!   authoritative cart
//! - `ClientError` - Transport failures and their classification
//! - `DependencyTag` / `TimeoutConfig` / `TimedCartClient` - Per-dependency
//!   timeouts around any client
//! - `ready_signal` - Explicit readiness instead of polling for a global
//! - `CartEventBus` - `Ready` / `RequestComplete` notifications
//! - `MemoryCartClient` - An in-memory cart service
//!
//! Nothing here retries. A failure goes straight back to the caller.

mod client;
mod dependency;
mod events;
mod memory;
mod readiness;
mod timeout;

pub use client::*;
pub use dependency::*;
pub use events::*;
pub use memory::*;
pub use readiness::*;
pub use timeout::*;
