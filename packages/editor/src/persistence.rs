//! # Block Persistence
//!
//! Best-effort local cache of the block list.
//!
//! The list is stored as plain JSON under a single fixed key (one global
//! slot, not per page or per site). It is not a source of truth: writes are
//! not atomic or versioned, and a failed write leaves the in-memory state
//! untouched.
//!
//! Two layers:
//! - `try_save` / `try_load` return every failure as a `PersistenceError`
//! - `save` / `load` log failures and degrade to "nothing persisted"

use serde_json::Value;
use sitecraft_model::Block;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Slot name used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "editor-blocks";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage backend
pub trait KeyValueStore: std::fmt::Debug {
    fn save(&mut self, key: &str, data: &str) -> Result<(), PersistenceError>;

    /// `Ok(None)` when nothing is stored under `key`
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;

    fn clear(&mut self) -> Result<(), PersistenceError>;
}

/// In-memory store (for testing, temp sessions)
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&mut self, key: &str, data: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), data.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.entries.clear();
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileStore {
    fn save(&mut self, key: &str, data: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), data)?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        if !self.dir.exists() {
            return Ok(());
        }
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false) {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// Outcome of a best-effort save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(String),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

/// Saves and restores the block list through a `KeyValueStore`
#[derive(Debug)]
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Memory-backed persistence (nothing survives the process)
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn try_save(&mut self, blocks: &[Block]) -> Result<(), PersistenceError> {
        let data = serde_json::to_string(blocks)?;
        self.store.save(&self.key, &data)
    }

    /// `Ok(None)` when the slot is empty
    pub fn try_load(&self) -> Result<Option<Vec<Block>>, PersistenceError> {
        match self.store.load(&self.key)? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    /// Save, logging instead of propagating any failure
    pub fn save(&mut self, blocks: &[Block]) -> SaveOutcome {
        match self.try_save(blocks) {
            Ok(()) => {
                tracing::debug!("Saved {} blocks under {}", blocks.len(), self.key);
                SaveOutcome::Saved
            }
            Err(e) => {
                tracing::warn!("Failed to save blocks: {}", e);
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    /// Load, returning an empty list when the slot is missing or unreadable
    pub fn load(&self) -> Vec<Block> {
        match self.try_load() {
            Ok(Some(blocks)) => blocks,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to load blocks: {}", e);
                Vec::new()
            }
        }
    }

    /// Drop the persisted slot
    pub fn clear(&mut self) -> SaveOutcome {
        match self.store.remove(&self.key) {
            Ok(()) => SaveOutcome::Saved,
            Err(e) => {
                tracing::warn!("Failed to clear blocks: {}", e);
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    /// Raw JSON currently in the slot, if parseable
    pub fn raw_value(&self) -> Option<Value> {
        self.store
            .load(&self.key)
            .ok()
            .flatten()
            .and_then(|data| serde_json::from_str(&data).ok())
    }
}
