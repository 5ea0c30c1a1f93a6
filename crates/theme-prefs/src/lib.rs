//! Shopper preference storage.
//!
//! Values are stored as JSON under namespaced keys. Storage is best effort:
//! when the backend is missing or broken, reads return defaults and writes
//! are dropped, so nothing upstream has to handle a preference failure.
//!
//! # Example
//!
//! ```rust
//! use theme_prefs::{PreferenceStore, ThemePreferences};
//!
//! let store = PreferenceStore::in_memory();
//! store.set("reduced-motion", &true);
//!
//! let prefs = ThemePreferences::load(&store);
//! assert!(prefs.reduced_motion);
//! assert!(prefs.notifications_enabled);
//! ```

mod backend;
mod error;
mod store;
mod theme;

pub use backend::{FileBackend, KvBackend, MemoryBackend, UnavailableBackend};
pub use error::PrefsError;
pub use store::PreferenceStore;
pub use theme::ThemePreferences;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{KvBackend, PreferenceStore, PrefsError, ThemePreferences};
}
