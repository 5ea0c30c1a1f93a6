//! Preference store error types.

use thiserror::Error;

/// Errors a preference backend can report.
///
/// Callers of `PreferenceStore::get` / `set` never see these; they are
/// logged and replaced by defaults. The `try_*` methods surface them.
#[derive(Error, Debug)]
pub enum PrefsError {
    /// The backing storage cannot be used at all (private browsing,
    /// quota exhausted, storage disabled).
    #[error("Preference storage unavailable: {0}")]
    Unavailable(String),

    /// A value could not be encoded or a stored value could not be decoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Reading or writing the backing storage failed.
    #[error("Storage operation failed: {0}")]
    Storage(String),
}

impl From<std::io::Error> for PrefsError {
    fn from(e: std::io::Error) -> Self {
        PrefsError::Storage(e.to_string())
    }
}
