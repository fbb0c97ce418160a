// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local durable key-value storage for the fallback backend.
//!
//! Values are JSON strings. Calls are synchronous; callers that need
//! read-modify-write atomicity must serialize access themselves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{AppError, Result};

/// String-keyed store of JSON documents.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per key inside a data directory.
pub struct FileKeyValue {
    dir: PathBuf,
}

impl FileKeyValue {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys embed user ids, so they are percent-encoded into a safe file name.
    fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl KeyValueStore for FileKeyValue {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.file_path(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read fallback file");
                Err(e.into())
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file_path(key);
        // Write then rename so a crash never leaves a half-written blob.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Key-value store held in memory.
#[derive(Default)]
pub struct MemoryKeyValue {
    entries: RwLock<HashMap<String, String>>,
    offline: AtomicBool,
}

impl MemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline, every operation fails with `StoreUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AppError::StoreUnavailable(
                "Local storage is unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryKeyValue {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_online()?;
        let entries = self
            .entries
            .read()
            .map_err(|_| AppError::StoreUnavailable("Local storage lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_online()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AppError::StoreUnavailable("Local storage lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
