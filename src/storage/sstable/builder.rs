//! SSTable Builder
//!
//! Collects sorted key-value entries and writes them as a new SSTable file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::KvError;

use super::{KvPair, SSTable};

/// Builder for creating new SSTables from sorted entries
///
/// Nothing touches the filesystem until `finish()`. The table is written to a
/// sibling `.tmp` file, synced, and renamed over the destination, so the
/// destination either keeps its previous contents or holds the complete table.
pub struct SSTableBuilder {
    /// Output file path
    path: PathBuf,
    /// Entries in the order they were added
    entries: Vec<KvPair>,
}

impl SSTableBuilder {
    /// Create a new SSTable builder targeting `path`
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: Vec::new(),
        }
    }

    /// Add a key-value pair (must be called in strictly ascending key order)
    pub fn add(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(last) = self.entries.last() {
            if key <= last.key.as_str() {
                return Err(KvError::Storage(format!(
                    "SSTable keys must be strictly ascending: {:?} after {:?}",
                    key, last.key
                )));
            }
        }
        self.entries.push(KvPair::new(key, value));
        Ok(())
    }

    /// Number of entries added so far
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Finish building: write the JSON array and return metadata
    pub fn finish(self) -> Result<SSTable> {
        let tmp_path = tmp_path(&self.path);

        let written = write_entries(&tmp_path, &self.entries)
            .and_then(|_| fs::rename(&tmp_path, &self.path).map_err(KvError::from));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        let file_size = fs::metadata(&self.path)?.len();

        Ok(SSTable {
            path: self.path,
            entry_count: self.entries.len() as u64,
            file_size,
        })
    }
}

/// Write an already sorted sequence of pairs as an SSTable at `path`
///
/// Fully replaces whatever was at `path`.
pub fn write_sstable(pairs: &[KvPair], path: &Path) -> Result<SSTable> {
    let mut builder = SSTableBuilder::new(path);
    for pair in pairs {
        builder.add(&pair.key, &pair.value)?;
    }
    builder.finish()
}

fn write_entries(path: &Path, entries: &[KvPair]) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, entries)?;
    writer.flush()?;

    let file: File = writer
        .into_inner()
        .map_err(|e| KvError::Storage(format!("Failed to flush SSTable: {}", e)))?;
    file.sync_all()?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
