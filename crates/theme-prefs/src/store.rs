//! Typed preference store with silent degradation.

use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};

use crate::backend::{KvBackend, MemoryBackend};
use crate::PrefsError;

/// JSON values over a `KvBackend`.
///
/// `get`, `set` and `remove` never fail: a broken backend or an
/// undecodable value reads as absent, and failed writes are dropped.
/// Use the `try_*` variants to observe the underlying error.
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Rc<dyn KvBackend>,
    namespace: String,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl PreferenceStore {
    /// Store over `backend`, prefixing every key with `namespace:`.
    pub fn new(backend: Rc<dyn KvBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    /// A throwaway store in memory.
    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryBackend::new()), "theme")
    }

    fn full_key(&self, key: &str) -> String {
        if self.namespace.is_empty() {
            key.to_string()
        } else {
            crate::pref_key!(self.namespace, key)
        }
    }

    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PrefsError> {
        match self.backend.get(&self.full_key(key))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn try_set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PrefsError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(&self.full_key(key), &raw)
    }

    pub fn try_remove(&self, key: &str) -> Result<(), PrefsError> {
        self.backend.remove(&self.full_key(key))
    }

    /// Read a value; `None` when absent or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, error = %e, "preference read failed");
                None
            }
        }
    }

    /// Read a value, falling back to `default`.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Write a value. Returns whether it was stored.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match self.try_set(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(key, error = %e, "preference write failed");
                false
            }
        }
    }

    /// Delete a value. Returns whether the backend accepted it.
    pub fn remove(&self, key: &str) -> bool {
        match self.try_remove(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(key, error = %e, "preference remove failed");
                false
            }
        }
    }

    /// Keys in this namespace, without the prefix.
    pub fn keys(&self) -> Vec<String> {
        let prefix = self.full_key("");
        self.backend
            .keys()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }
}

/// Build a namespaced preference key.
///
/// ```rust
/// let key = theme_prefs::pref_key!("theme", "motion");
/// assert_eq!(key, "theme:motion");
/// ```
#[macro_export]
macro_rules! pref_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix.to_string());
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
