//! Key-value backends for option persistence.
//!
//! The host CMS owns the real option table; the core only needs get/set/
//! delete of JSON values by name. Two reference implementations are
//! provided: an in-memory map for tests and embedders, and a single-file
//! JSON store for standalone use.

use crate::StoreResult;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

/// Generic key-value option storage.
pub trait ConfigBackend {
    /// Reads an option value, `None` when absent.
    fn get(&self, name: &str) -> StoreResult<Option<Value>>;

    /// Writes an option value, replacing any previous one.
    fn set(&mut self, name: &str, value: Value) -> StoreResult<()>;

    /// Removes an option. Removing an absent option is not an error.
    fn delete(&mut self, name: &str) -> StoreResult<()>;
}

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    options: BTreeMap<String, Value>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an option value, for constructing test fixtures.
    #[must_use]
    pub fn with_option(mut self, name: &str, value: Value) -> Self {
        self.options.insert(name.to_string(), value);
        self
    }
}

impl ConfigBackend for MemoryBackend {
    fn get(&self, name: &str) -> StoreResult<Option<Value>> {
        Ok(self.options.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: Value) -> StoreResult<()> {
        self.options.insert(name.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, name: &str) -> StoreResult<()> {
        self.options.remove(name);
        Ok(())
    }
}

/// File backend storing all options in one JSON object.
///
/// An unreadable or corrupt file degrades to an empty option set with a
/// warning; the next write replaces it.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_options(&self) -> Map<String, Value> {
        if !self.path.exists() {
            return Map::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Corrupt option file, treating as empty");
                    Map::new()
                }
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable option file, treating as empty");
                Map::new()
            }
        }
    }

    fn write_options(&self, options: &Map<String, Value>) -> StoreResult<()> {
        let contents = serde_json::to_string_pretty(options)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl ConfigBackend for JsonFileBackend {
    fn get(&self, name: &str) -> StoreResult<Option<Value>> {
        Ok(self.read_options().get(name).cloned())
    }

    fn set(&mut self, name: &str, value: Value) -> StoreResult<()> {
        let mut options = self.read_options();
        options.insert(name.to_string(), value);
        self.write_options(&options)
    }

    fn delete(&mut self, name: &str) -> StoreResult<()> {
        let mut options = self.read_options();
        if options.remove(name).is_some() {
            self.write_options(&options)?;
        }
        Ok(())
    }
}
