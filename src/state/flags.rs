//! Persisted Flags - Small client-local boolean settings
//!
//! Flags are read on mount and written on user action, e.g. whether the
//! reward instructions banner has been dismissed. The payload is a flat
//! JSON object of booleans; there is no schema version.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Set once the user closes the reward instructions banner.
pub const REWARD_INSTRUCTIONS_DISMISSED: &str = "reward_instructions_dismissed";

/// Key/value store for boolean flags. Unknown keys read as `false`.
pub trait FlagStore {
    fn get(&self, key: &str) -> bool;
    fn set(&self, key: &str, value: bool) -> Result<()>;
}

// =============================================================================
// In-memory
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flags: RefCell<HashMap<String, bool>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> bool {
        self.flags.borrow().get(key).copied().unwrap_or(false)
    }

    fn set(&self, key: &str, value: bool) -> Result<()> {
        self.flags.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

// =============================================================================
// File-backed
// =============================================================================

/// Flags stored as a JSON object on disk. Loaded once, written through.
#[derive(Debug)]
pub struct FileFlagStore {
    path: PathBuf,
    flags: RefCell<HashMap<String, bool>>,
}

impl FileFlagStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let flags: HashMap<String, bool> = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|err| {
                Error::Persist(format!("corrupt flag file {}: {err}", path.display()))
            })?
        } else {
            HashMap::new()
        };
        debug!(path = %path.display(), count = flags.len(), "flag store opened");
        Ok(Self {
            path,
            flags: RefCell::new(flags),
        })
    }

    /// Open the store, starting empty if the file is unreadable.
    pub fn open_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable flag file");
                Self {
                    path,
                    flags: RefCell::new(HashMap::new()),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(&*self.flags.borrow())?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl FlagStore for FileFlagStore {
    fn get(&self, key: &str) -> bool {
        self.flags.borrow().get(key).copied().unwrap_or(false)
    }

    fn set(&self, key: &str, value: bool) -> Result<()> {
        self.flags.borrow_mut().insert(key.to_string(), value);
        self.persist()
    }
}
