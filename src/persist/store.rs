//! Storage sinks for autosaved editor state.
//!
//! Stores hold the same JSON the export path writes, and loading goes back
//! through [`import_json`], so stale data written under older limits is
//! re-validated and clamped like any imported file.
//!
//! Storage is best effort. Callers log failures and keep editing; the live
//! session is always the source of truth.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{StorageError, StorageResult};

use super::PatternDocument;
use super::format::{export_now, import_json};

pub trait StateStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> StorageResult<Option<PatternDocument>>;

    fn save(&self, doc: &PatternDocument) -> StorageResult<()>;

    fn clear(&self) -> StorageResult<()>;

    fn is_available(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// In-process store, for tests and sessions that should not touch disk.
#[derive(Default)]
pub struct MemoryStore {
    json: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated with raw JSON, which need not be valid.
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: RwLock::new(Some(json.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.json.read().ok().and_then(|g| g.clone())
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Corruption("lock poisoned".into())
}

impl StateStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn load(&self) -> StorageResult<Option<PatternDocument>> {
        let guard = self.json.read().map_err(poisoned)?;
        match guard.as_deref() {
            Some(json) => Ok(Some(import_json(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, doc: &PatternDocument) -> StorageResult<()> {
        let json = export_now(doc)?;
        *self.json.write().map_err(poisoned)? = Some(json);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        *self.json.write().map_err(poisoned)? = None;
        Ok(())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stored = self.json.read().map(|g| g.is_some()).unwrap_or(false);
        f.debug_struct("MemoryStore").field("stored", &stored).finish()
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// JSON file store. Writes go to `{path}.tmp` and are renamed into place.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `$XDG_STATE_HOME/pixel-pattern/autosave.json`, falling back to
    /// `~/.local/state` and then the current directory.
    pub fn default_location() -> Self {
        Self::new(state_dir().join("autosave.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }
}

/// Directory for autosave and log files.
pub fn state_dir() -> PathBuf {
    let base = if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        PathBuf::from(state_home)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local").join("state")
    } else {
        PathBuf::from(".")
    };
    base.join("pixel-pattern")
}

impl StateStore for FileStore {
    fn name(&self) -> &str {
        "FileStore"
    }

    fn load(&self) -> StorageResult<Option<PatternDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(import_json(&json)?))
    }

    fn save(&self, doc: &PatternDocument) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = export_now(doc)?;

        let tmp_path = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            writer.write_all(json.as_bytes())?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "saved editor state");
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        match self.path.parent() {
            Some(parent) if !parent.exists() => fs::create_dir_all(parent).is_ok(),
            Some(parent) => {
                let probe = parent.join(".pixel_pattern_write_test");
                let ok = fs::write(&probe, b"test").is_ok();
                let _ = fs::remove_file(&probe);
                ok
            }
            None => false,
        }
    }
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn doc() -> PatternDocument {
        let mut grid = Grid::new(4, 3);
        grid.set(1, 2, 1);
        PatternDocument {
            grid,
            ..Default::default()
        }
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&doc()).unwrap();
        assert_eq!(store.load().unwrap(), Some(doc()));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn stale_values_are_clamped_on_load() {
        let store = MemoryStore::with_json(
            r##"{"version":1,
                "grid":{"width":2,"height":2,"aspectRatio":0.01,"cells":[[0,0],[0,0]]},
                "colors":{"background":"#FFFFFF","pattern":["#000000"]},
                "preview":{"repeatX":40,"repeatY":2}}"##,
        );
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.aspect_ratio, 0.1);
        assert_eq!(loaded.repeat_x, 10);
    }

    #[test]
    fn corrupt_memory_state_is_an_error() {
        let store = MemoryStore::with_json("garbage");
        assert!(matches!(store.load(), Err(StorageError::Import(_))));
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("state.json"));
        assert!(store.load().unwrap().is_none());
        store.save(&doc()).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), Some(doc()));
        store.clear().unwrap();
        assert!(!store.path().exists());
    }
}
