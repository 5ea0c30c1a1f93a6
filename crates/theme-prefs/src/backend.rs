//! Raw string storage behind the preference store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::PrefsError;

/// Key-value storage of raw JSON strings.
pub trait KvBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;

    fn remove(&self, key: &str) -> Result<(), PrefsError>;

    fn keys(&self) -> Result<Vec<String>, PrefsError>;
}

/// Storage held in memory for the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, PrefsError> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

/// Storage in a single JSON object file. Every write rewrites the file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, PrefsError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl KvBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.store(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, PrefsError> {
        Ok(self.load()?.into_keys().collect())
    }
}

/// Storage that refuses every operation, like a browser with storage
/// disabled.
#[derive(Debug, Clone, Default)]
pub struct UnavailableBackend;

impl KvBackend for UnavailableBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, PrefsError> {
        Err(PrefsError::Unavailable("storage disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PrefsError> {
        Err(PrefsError::Unavailable("storage disabled".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), PrefsError> {
        Err(PrefsError::Unavailable("storage disabled".into()))
    }

    fn keys(&self) -> Result<Vec<String>, PrefsError> {
        Err(PrefsError::Unavailable("storage disabled".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "theme-prefs-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_memory_backend() {
        let backend = MemoryBackend::new();
        backend.set("a", "1").unwrap();
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("1"));
        backend.remove("a").unwrap();
        assert_eq!(backend.get("a").unwrap(), None);
    }

    #[test]
    fn test_file_backend_persists() {
        let path = temp_path("persist");
        let _ = fs::remove_file(&path);

        FileBackend::new(&path).set("theme:motion", "true").unwrap();
        let reopened = FileBackend::new(&path);
        assert_eq!(reopened.get("theme:motion").unwrap().as_deref(), Some("true"));
        assert_eq!(reopened.keys().unwrap(), vec!["theme:motion".to_string()]);

        reopened.remove("theme:motion").unwrap();
        assert_eq!(reopened.get("theme:motion").unwrap(), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_backend_corrupt_file_errors() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileBackend::new(&path).get("x"),
            Err(PrefsError::Serialize(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unavailable_backend() {
        assert!(matches!(
            UnavailableBackend.get("x"),
            Err(PrefsError::Unavailable(_))
        ));
    }
}
