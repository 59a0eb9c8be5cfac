//! Backend selection
//!
//! The backend is picked once, from configuration, before any panel is
//! attached. An unknown name is a startup error.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{BallRecord, FileStorage, MemoryStorage, Storage};
#[cfg(target_arch = "wasm32")]
use super::LocalStorage;
use crate::{Error, Result};

/// Default save location for the `file` backend
pub const DEFAULT_SAVE_PATH: &str = "ball-panels-save.json";

/// Known storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    File,
    /// Browser LocalStorage (wasm32 only)
    Local,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Memory => "memory",
            StorageKind::File => "file",
            StorageKind::Local => "local",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageKind::Memory),
            "file" => Ok(StorageKind::File),
            "local" | "localstorage" => Ok(StorageKind::Local),
            other => Err(Error::Configuration(format!(
                "unknown storage backend {other:?}"
            ))),
        }
    }
}

/// The concrete backend in use
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory(MemoryStorage),
    File(FileStorage),
    #[cfg(target_arch = "wasm32")]
    Local(LocalStorage),
}

impl StorageBackend {
    /// Build the backend named by `kind`. `path` only matters for `file`.
    pub fn open(kind: StorageKind, path: Option<PathBuf>) -> Result<Self> {
        log::info!("Using {kind} storage");
        match kind {
            StorageKind::Memory => Ok(StorageBackend::Memory(MemoryStorage::new())),
            StorageKind::File => Ok(StorageBackend::File(FileStorage::new(
                path.unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH)),
            ))),
            #[cfg(target_arch = "wasm32")]
            StorageKind::Local => Ok(StorageBackend::Local(LocalStorage::open()?)),
            #[cfg(not(target_arch = "wasm32"))]
            StorageKind::Local => Err(Error::Configuration(
                "local storage is only available in the browser".into(),
            )),
        }
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            StorageBackend::Memory(_) => StorageKind::Memory,
            StorageBackend::File(_) => StorageKind::File,
            #[cfg(target_arch = "wasm32")]
            StorageBackend::Local(_) => StorageKind::Local,
        }
    }

    fn inner(&self) -> &dyn Storage {
        match self {
            StorageBackend::Memory(s) => s,
            StorageBackend::File(s) => s,
            #[cfg(target_arch = "wasm32")]
            StorageBackend::Local(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Storage {
        match self {
            StorageBackend::Memory(s) => s,
            StorageBackend::File(s) => s,
            #[cfg(target_arch = "wasm32")]
            StorageBackend::Local(s) => s,
        }
    }
}

impl Storage for StorageBackend {
    fn save(&mut self, records: &[BallRecord]) -> Result<()> {
        self.inner_mut().save(records)
    }

    fn load(&self) -> Result<Option<Vec<BallRecord>>> {
        self.inner().load()
    }

    fn set_autosave(&mut self, enabled: bool) -> Result<()> {
        self.inner_mut().set_autosave(enabled)
    }

    fn autosave(&self) -> Result<bool> {
        self.inner().autosave()
    }

    fn clear(&mut self) -> Result<()> {
        self.inner_mut().clear()
    }
}
