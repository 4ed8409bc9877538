//! Append-only file backend
//!
//! Each `store` appends one JSON record per line. Reads replay the whole file,
//! so the last record written for a key wins. The file is opened inside every
//! operation and closed when the handle drops at the end of the call.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Backend, StoreError};

#[derive(Serialize, Deserialize, Debug)]
struct FileRecord {
    key: String,
    value: String,
}

/// Stateless handle to an on-disk store. Cloning it is free.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replay the log into a map. A missing file is an empty store.
    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = BTreeMap::new();

        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let record: FileRecord = serde_json::from_str(&line)?;
            records.insert(record.key, record.value);
        }

        Ok(records)
    }
}

impl Backend for FileStore {
    fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let record = FileRecord {
            key: key.to_string(),
            value: value.to_string(),
        };

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.write_all(line.as_bytes())?;
        file.flush()?;

        tracing::trace!(path = %self.path.display(), key, "Record appended");
        Ok(())
    }

    fn fetch(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn fetch_all(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self.load()?.into_iter().collect())
    }
}
