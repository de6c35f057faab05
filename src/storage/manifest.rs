//! Manifest
//!
//! Durable, ordered record of which SSTables exist.
//!
//! ## Files
//! ```text
//! MANIFEST           sst-1.json\nsst-2.json\n...   (append-only)
//! MANIFEST.counter   {"counter":2}                 (replaced via tmp + rename)
//! ```
//! The log is the source of truth for the table list. The counter file keeps
//! the sequence number from ever going backwards if the log loses lines; on
//! load the counter is the largest of the persisted counter, the number of
//! log entries and the highest sequence found in an entry name.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memtable::MemTable;
use crate::KvError;

use super::sstable::{parse_sequence, sstable_file_name, write_sstable};

/// Suffix appended to the log path for the counter file
const COUNTER_SUFFIX: &str = ".counter";

/// In-memory view of the log
struct ManifestState {
    /// SSTable names, oldest first
    sstables: Vec<String>,
    /// Highest sequence number handed out so far
    counter: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct CounterFile {
    counter: u64,
}

/// The manifest
///
/// ## Concurrency:
/// - `log`: Mutex; held for a whole flush, so flushes never interleave
/// - `state`: RwLock; readers snapshot the table list while a flush runs
///
/// Lock order during a flush: log → memtable (write) → state (write).
pub struct Manifest {
    /// Path of the append-only log
    path: PathBuf,
    /// Directory SSTable names are resolved against
    dir: PathBuf,
    /// Open log handle (append mode)
    log: Mutex<File>,
    state: RwLock<ManifestState>,
}

impl Manifest {
    /// Open or create the manifest log at `path` and load it
    pub fn load(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;

        let sstables = parse_log(&mut file)?;
        let persisted = read_counter(&counter_path(path));
        let highest_named = sstables.iter().filter_map(|n| parse_sequence(n)).max();

        let counter = persisted
            .unwrap_or(0)
            .max(sstables.len() as u64)
            .max(highest_named.unwrap_or(0));

        for name in &sstables {
            if parse_sequence(name).is_none() {
                tracing::warn!("Manifest entry {:?} does not look like an SSTable name", name);
            }
        }

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        tracing::info!(
            "Loaded manifest {}: {} tables, counter={}",
            path.display(),
            sstables.len(),
            counter
        );

        Ok(Self {
            path: path.to_path_buf(),
            dir,
            log: Mutex::new(file),
            state: RwLock::new(ManifestState { sstables, counter }),
        })
    }

    /// Flush `memtable` into the next SSTable and record it
    ///
    /// Steps, all under the memtable's write lock:
    /// 1. Write `sst-{counter+1}.json`
    /// 2. Append its name to the log and sync
    /// 3. Record it in memory and bump the counter
    /// 4. Persist the counter file (failure only logged)
    ///
    /// If step 1 or 2 fails the memtable keeps its entries and the manifest is
    /// unchanged. Returns the new table's name.
    pub fn flush(&self, memtable: &MemTable) -> Result<String> {
        let mut log = self.log.lock();

        let sequence = self.state.read().counter + 1;
        let name = sstable_file_name(sequence);
        let table_path = self.table_path(&name);

        let mut written = None;
        memtable.flush_with(|pairs| {
            let table = write_sstable(pairs, &table_path)?;
            append_line(&mut log, &name)?;

            let mut state = self.state.write();
            state.sstables.push(name.clone());
            state.counter = sequence;
            written = Some(table);
            Ok(())
        })?;

        if let Err(e) = write_counter(&counter_path(&self.path), sequence) {
            tracing::warn!("Failed to persist manifest counter {}: {}", sequence, e);
        }

        if let Some(table) = written {
            tracing::info!(
                "Flushed {} entries to {} ({} bytes)",
                table.entry_count,
                name,
                table.file_size
            );
        }
        Ok(name)
    }

    /// SSTable names, oldest first
    pub fn tables(&self) -> Vec<String> {
        self.state.read().sstables.clone()
    }

    /// SSTable names, newest first (lookup order)
    pub fn tables_newest_first(&self) -> Vec<String> {
        self.state.read().sstables.iter().rev().cloned().collect()
    }

    pub fn table_count(&self) -> usize {
        self.state.read().sstables.len()
    }

    /// Highest sequence number handed out so far
    pub fn counter(&self) -> u64 {
        self.state.read().counter
    }

    /// Resolve a table name from the log to a path
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Path of the manifest log
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// =============================================================================
// Private Helpers
// =============================================================================

/// One name per line; blank lines are skipped, a trailing unterminated line
/// still counts. Invalid UTF-8 is replaced rather than rejected.
fn parse_log(file: &mut File) -> Result<Vec<String>> {
    let size = file.metadata()?.len();
    if size == 0 {
        return Ok(Vec::new());
    }

    let mut contents = Vec::with_capacity(size as usize);
    file.read_to_end(&mut contents)?;

    Ok(contents
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect())
}

/// Append `name\n` and sync. On failure the log is cut back to its previous
/// length so a torn line never survives into the next load.
fn append_line(log: &mut File, name: &str) -> Result<()> {
    let previous_len = log.metadata()?.len();

    let written = log
        .write_all(format!("{}\n", name).as_bytes())
        .and_then(|_| log.sync_data());

    if let Err(e) = written {
        if let Err(trunc) = log.set_len(previous_len) {
            tracing::error!("Failed to roll back manifest append: {}", trunc);
        }
        return Err(KvError::Manifest(format!(
            "Failed to append {} to manifest: {}",
            name, e
        )));
    }
    Ok(())
}

fn counter_path(log_path: &Path) -> PathBuf {
    let mut name = log_path.as_os_str().to_os_string();
    name.push(COUNTER_SUFFIX);
    PathBuf::from(name)
}

/// A counter file that cannot be read or parsed is ignored; the log alone
/// still bounds the counter.
fn read_counter(path: &Path) -> Option<u64> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("Ignoring unreadable counter file {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_slice::<CounterFile>(&contents) {
        Ok(file) => Some(file.counter),
        Err(e) => {
            tracing::warn!("Ignoring invalid counter file {}: {}", path.display(), e);
            None
        }
    }
}

fn write_counter(path: &Path, counter: u64) -> Result<()> {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&tmp)?;
    let encoded = serde_json::to_string(&CounterFile { counter })?;
    file.write_all(encoded.as_bytes())?;
    file.sync_all()?;

    fs::rename(&tmp, path)?;
    Ok(())
}
