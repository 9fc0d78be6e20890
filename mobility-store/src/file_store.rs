//! JSON File State Store
//!
//! Keeps the persisted controller state as one flat JSON object:
//!
//! ```json
//! {"belief.STILL": 0.91, "state": "STILL", "state_start": 1700000000000, ...}
//! ```
//!
//! Writes go to an in-memory map. `commit` serializes the map to
//! `<path>.tmp` and renames it over `<path>`, so a reader never sees a
//! half-written file. A file that does not parse is treated like a missing
//! one; the core then starts from its defaults.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, warn};
use mobility_core::{MobilityError, MobilityResult, StateStore};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    /// Load `path`, or start empty if it is missing or unreadable as JSON
    ///
    /// I/O errors other than "not found" are returned.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let values = match Self::load(&path) {
            Ok(values) => values,
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(StoreError::Io(e)) => return Err(StoreError::Io(e)),
            Err(e) => {
                warn!("ignoring unreadable state file {}: {}", path.display(), e);
                Map::new()
            }
        };

        Ok(Self { path, values })
    }

    fn load(path: &Path) -> StoreResult<Map<String, Value>> {
        let text = fs::read_to_string(path)?;
        match serde_json::from_str(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write the current map to disk atomically
    pub fn save(&self) -> StoreResult<()> {
        let tmp = self.path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, &self.values)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        debug!("saved {} keys to {}", self.values.len(), self.path.display());
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn get_float(&self, key: &str) -> Option<f64> {
        self.values.get(key)?.as_f64()
    }

    fn get_int(&self, key: &str) -> Option<u64> {
        self.values.get(key)?.as_u64()
    }

    fn get_text(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.as_str()
    }

    fn put_float(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_owned(), Value::from(value));
    }

    fn put_int(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_owned(), Value::from(value));
    }

    fn put_text(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), Value::from(value));
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn commit(&mut self) -> MobilityResult<()> {
        self.save().map_err(|e| {
            error!("failed to save {}: {}", self.path.display(), e);
            MobilityError::Storage {
                reason: "state file could not be written",
            }
        })
    }
}
