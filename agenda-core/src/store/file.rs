//! JSON file store.
//!
//! The data set lives in `<data_dir>/agenda.json`. Changes are written to a
//! temp file and renamed over the old one, so readers of the file never see a
//! half-written series. Every write holds an exclusive lock on
//! `<data_dir>/agenda.lock` and re-reads the file under it, so concurrent
//! processes sharing a data directory never overwrite each other's changes.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{AgendaError, AgendaResult};
use crate::store::{Snapshot, SnapshotStore};

const DATA_FILE: &str = "agenda.json";
const LOCK_FILE: &str = "agenda.lock";

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

/// Holds the data directory lock until dropped.
struct LockGuard {
    _file: File,
}

impl FileStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    ///
    /// An existing data file is parsed up front so corruption is reported
    /// here rather than on first use.
    pub fn open(data_dir: &Path) -> AgendaResult<Self> {
        std::fs::create_dir_all(data_dir)?;
        let store = FileStore {
            path: data_dir.join(DATA_FILE),
            lock_path: data_dir.join(LOCK_FILE),
        };

        {
            let _guard = store.lock(false)?;
            store.load()?;
        }

        tracing::debug!(path = %store.path.display(), "opened file store");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self, exclusive: bool) -> AgendaResult<LockGuard> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;

        let locked = if exclusive {
            FileExt::lock_exclusive(&file)
        } else {
            FileExt::lock_shared(&file)
        };
        locked.map_err(|e| {
            AgendaError::Storage(format!("Could not lock {}: {e}", self.lock_path.display()))
        })?;

        Ok(LockGuard { _file: file })
    }

    fn load(&self) -> AgendaResult<Snapshot> {
        if !self.path.exists() {
            return Ok(Snapshot::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            AgendaError::Serialization(format!("Could not read {}: {e}", self.path.display()))
        })
    }

    fn persist(&self, snapshot: &Snapshot) -> AgendaResult<()> {
        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| AgendaError::Serialization(e.to_string()))?;

        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;

        tracing::debug!(path = %self.path.display(), "saved file store");
        Ok(())
    }
}

impl SnapshotStore for FileStore {
    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> AgendaResult<T> {
        let _guard = self.lock(false)?;
        let snapshot = self.load()?;
        Ok(f(&snapshot))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Snapshot) -> AgendaResult<T>) -> AgendaResult<T> {
        let _guard = self.lock(true)?;

        // Start from what is on disk now, not what this handle saw earlier.
        let mut snapshot = self.load()?;
        let result = f(&mut snapshot)?;
        self.persist(&snapshot)?;
        Ok(result)
    }
}
