//! Cart state reconciliation.

mod plan;
mod reconciler;

pub use plan::*;
pub use reconciler::*;
