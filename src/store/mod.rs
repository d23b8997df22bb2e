//! Thread-safe, file-backed ini storage.
//!
//! An [`IniStore`] owns the parsed contents of one ini file. Every call takes
//! the store's lock, reloads the file if it changed on disk since the last
//! load or write, and works on the in-memory table. Writes rewrite the whole
//! file. Stores are obtained through a [`StoreRegistry`], which guarantees a
//! single store per path.

mod registry;
mod value;

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::codec::{self, ConfigTable};
use crate::error::StoreError;

pub use registry::{default_path, StoreRegistry};
pub use value::{FromIniValue, ToIniValue};

/// What was on disk the last time the table was loaded or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: SystemTime,
    len: u64,
}

impl FileStamp {
    /// Stamp of the file at `path`, or `None` if it does not exist.
    fn probe(path: &Path) -> Result<Option<Self>, StoreError> {
        match fs::metadata(path) {
            Ok(meta) => {
                let modified = meta.modified().map_err(|source| StoreError::Metadata {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(Some(Self {
                    modified,
                    len: meta.len(),
                }))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Metadata {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Stamp of a file that must exist.
    fn read(path: &Path) -> Result<Self, StoreError> {
        Self::probe(path)?.ok_or_else(|| StoreError::Metadata {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    }
}

#[derive(Debug, Default)]
struct StoreState {
    table: ConfigTable,
    /// `None` until the first load or write.
    stamp: Option<FileStamp>,
}

/// Typed access to one ini file, shared between threads.
///
/// All operations on a store are serialized by a single mutex covering the
/// table, the recorded file stamp and the file I/O.
pub struct IniStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl IniStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Full path of the backing file.
    pub fn full_path(&self) -> &Path {
        &self.path
    }

    /// Read `key` as `T`.
    ///
    /// Returns `default` when the file does not exist, the key is absent,
    /// the stored value is empty, or the value does not convert to `T`.
    /// Fails only if the file changed on disk and cannot be reloaded.
    pub fn get<T: FromIniValue>(&self, key: &str, default: T) -> Result<T, StoreError> {
        let mut state = self.state.lock();
        let Some(stamp) = FileStamp::probe(&self.path)? else {
            return Ok(default);
        };
        self.refresh(&mut state, stamp)?;

        let value = match state.table.get(key) {
            None | Some("") => default,
            Some(raw) => T::from_raw(raw).unwrap_or_else(|| {
                tracing::warn!(
                    key = %key,
                    value = %raw,
                    "Stored value does not convert, using default"
                );
                default
            }),
        };
        Ok(value)
    }

    /// Read the key produced by `key` as `T`.
    ///
    /// ```no_run
    /// # fn demo(store: &inistore::IniStore) -> Result<(), inistore::StoreError> {
    /// let index = 0;
    /// let src: String = store.get_fmt(String::new(), format_args!("network.routes.item{}.src", index))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_fmt<T: FromIniValue>(
        &self,
        default: T,
        key: fmt::Arguments<'_>,
    ) -> Result<T, StoreError> {
        self.get(&key.to_string(), default)
    }

    /// Store `value` under `key` and rewrite the file.
    ///
    /// Creates the file and its parent directories when missing. A key
    /// without a section is kept in memory but is never written out. If the
    /// write fails the in-memory table is unchanged.
    pub fn set(&self, key: &str, value: impl ToIniValue) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let stamp = match FileStamp::probe(&self.path)? {
            Some(stamp) => stamp,
            None => {
                let stamp = self.create_file()?;
                state.stamp = Some(stamp);
                stamp
            }
        };
        self.refresh(&mut state, stamp)?;

        let mut table = state.table.clone();
        table.insert(key, value.to_raw());
        self.persist(&mut state, table)
    }

    /// Current contents of the table, reloaded first if the file changed.
    ///
    /// Empty when the file does not exist.
    pub fn snapshot(&self) -> Result<ConfigTable, StoreError> {
        let mut state = self.state.lock();
        let Some(stamp) = FileStamp::probe(&self.path)? else {
            return Ok(ConfigTable::new());
        };
        self.refresh(&mut state, stamp)?;
        Ok(state.table.clone())
    }

    /// Print the raw file to stdout. Failures are logged, not returned; use
    /// [`IniStore::dump_to`] to handle them.
    pub fn dump(&self) {
        if let Err(e) = self.dump_to(io::stdout().lock()) {
            tracing::error!(error = %e, "Failed to dump ini file");
        }
    }

    /// Copy the raw file to `out`.
    pub fn dump_to<W: Write>(&self, mut out: W) -> Result<(), StoreError> {
        let _state = self.state.lock();
        let content = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        out.write_all(&content)
            .and_then(|()| out.flush())
            .map_err(StoreError::Output)
    }

    fn refresh(&self, state: &mut StoreState, stamp: FileStamp) -> Result<(), StoreError> {
        if state.stamp == Some(stamp) {
            return Ok(());
        }

        let bytes = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        state.table = codec::parse(&String::from_utf8_lossy(&bytes));
        state.stamp = Some(stamp);

        tracing::debug!(
            path = %self.path.display(),
            entries = state.table.len(),
            "Reloaded ini file"
        );
        Ok(())
    }

    /// Write `table` and make it current. On failure the state is left as
    /// it was.
    fn persist(&self, state: &mut StoreState, table: ConfigTable) -> Result<(), StoreError> {
        let text = codec::serialize(&table);
        fs::write(&self.path, text).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        state.table = table;
        state.stamp = Some(FileStamp::read(&self.path)?);
        Ok(())
    }

    fn create_file(&self) -> Result<FileStamp, StoreError> {
        tracing::info!(path = %self.path.display(), "Ini file doesn't exist, creating it");

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tracing::info!(path = %parent.display(), "Creating directory");
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|source| StoreError::CreateFile {
                path: self.path.clone(),
                source,
            })?;

        FileStamp::read(&self.path)
    }
}

impl fmt::Debug for IniStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IniStore").field("path", &self.path).finish()
    }
}

/// Stores are identified by their path.
impl PartialEq for IniStore {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for IniStore {}
