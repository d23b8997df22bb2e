use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::IniStore;
use crate::error::StoreError;

/// Binds each file path to exactly one [`IniStore`].
///
/// Paths are canonicalized before lookup, so `./a.ini`, `dir/../a.ini` and
/// a symlink to `a.ini` all resolve to the same store. Cloning the registry
/// shares the bindings.
#[derive(Clone, Default)]
pub struct StoreRegistry {
    stores: Arc<Mutex<HashMap<PathBuf, Arc<IniStore>>>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The store for `path`, created on first use.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Arc<IniStore>, StoreError> {
        let identity = canonical_identity(path.as_ref())?;
        let mut stores = self.stores.lock();
        let store = stores.entry(identity.clone()).or_insert_with(|| {
            tracing::debug!(path = %identity.display(), "Registering ini store");
            Arc::new(IniStore::new(identity))
        });
        Ok(Arc::clone(store))
    }

    /// Drop the binding for `path` if nothing outside the registry still
    /// holds its store. Returns whether the binding was removed.
    pub fn release(&self, path: impl AsRef<Path>) -> Result<bool, StoreError> {
        let identity = canonical_identity(path.as_ref())?;
        let mut stores = self.stores.lock();
        match stores.get(&identity) {
            Some(store) if Arc::strong_count(store) == 1 => {
                stores.remove(&identity);
                tracing::debug!(path = %identity.display(), "Released ini store");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Number of bound stores.
    pub fn len(&self) -> usize {
        self.stores.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.lock().is_empty()
    }
}

/// Default settings file for `app`.
///
/// Uses `~/.config/<app>/settings.ini` on Linux, or the platform equivalent
/// via `dirs::config_dir()`. Falls back to the current directory if there
/// is no config directory.
pub fn default_path(app: &str) -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config_dir.join(app).join("settings.ini")
}

/// Absolute, normalized path with symlinks resolved for the part that
/// exists. The file itself does not need to exist yet.
fn canonical_identity(path: &Path) -> Result<PathBuf, StoreError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|source| StoreError::ResolvePath {
            path: path.to_path_buf(),
            source,
        })?;
        cwd.join(path)
    };
    let normalized = normalize(&absolute);

    let mut existing = normalized.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(mut resolved) = fs::canonicalize(existing) {
            for name in missing.iter().rev() {
                resolved.push(name);
            }
            return Ok(resolved);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(normalized),
        }
    }
}

/// Resolve `.` and `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
