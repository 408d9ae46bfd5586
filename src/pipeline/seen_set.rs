//! Persisted set of already-announced disclosure fingerprints

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::errors::{Result, ScanError};
use crate::common::types::Fingerprint;

/// One persisted line: a fingerprint and when it was first announced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenEntry {
    pub fingerprint: Fingerprint,
    pub first_seen: DateTime<Utc>,
}

/// The seen set, loaded fully into memory for one scan cycle
///
/// On disk it is JSON Lines, one [`SeenEntry`] per line, which keeps a
/// half-written trailing line from poisoning the rest of the file.
/// Loading is fail-soft: absence or damage yields a smaller set and a log
/// line, never an error, since the worst outcome is a repeated alert.
/// Writing is the opposite: [`SeenSetStore::flush`] reports failures
/// loudly so the cycle is marked failed.
#[derive(Debug)]
pub struct SeenSetStore {
    path: PathBuf,
    entries: BTreeMap<Fingerprint, DateTime<Utc>>,
}

impl SeenSetStore {
    /// Read the store from disk, tolerating absence and damage
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Seen set {} not found, starting empty", path.display());
                return Self {
                    path,
                    entries: BTreeMap::new(),
                };
            }
            Err(e) => {
                warn!(
                    "Seen set {} unreadable ({}), starting empty",
                    path.display(),
                    e
                );
                return Self {
                    path,
                    entries: BTreeMap::new(),
                };
            }
        };

        let mut entries = BTreeMap::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(
                        "Seen set {} stopped reading at line {}: {}",
                        path.display(),
                        index + 1,
                        e
                    );
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SeenEntry>(&line) {
                Ok(entry) => {
                    entries.entry(entry.fingerprint).or_insert(entry.first_seen);
                }
                Err(e) => {
                    warn!(
                        "Seen set {} line {} skipped: {}",
                        path.display(),
                        index + 1,
                        e
                    );
                }
            }
        }

        debug!(
            "Loaded {} seen fingerprints from {}",
            entries.len(),
            path.display()
        );
        Self { path, entries }
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a fingerprint, keeping the earliest timestamp on repeats
    pub fn record(&mut self, fingerprint: Fingerprint, first_seen: DateTime<Utc>) {
        self.entries.entry(fingerprint).or_insert(first_seen);
    }

    /// Drop the oldest entries until at most `max_entries` remain
    ///
    /// Timestamp ties break on the fingerprint so pruning is
    /// deterministic. Returns how many entries were dropped.
    pub fn prune(&mut self, max_entries: usize) -> usize {
        if self.entries.len() <= max_entries {
            return 0;
        }
        let excess = self.entries.len() - max_entries;
        let mut ordered: Vec<(DateTime<Utc>, Fingerprint)> = self
            .entries
            .iter()
            .map(|(fp, ts)| (*ts, fp.clone()))
            .collect();
        ordered.sort();
        for (_, fingerprint) in ordered.into_iter().take(excess) {
            self.entries.remove(&fingerprint);
        }
        excess
    }

    /// Write the store to disk atomically
    ///
    /// The contents go to a temporary file in the same directory and
    /// replace the old file by rename, so a crash mid-write leaves the
    /// previous store intact.
    pub fn flush(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .map_err(|e| ScanError::Storage(format!("creating {}: {}", dir.display(), e)))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| {
            ScanError::Storage(format!("creating temp file in {}: {}", dir.display(), e))
        })?;
        for (fingerprint, first_seen) in &self.entries {
            let entry = SeenEntry {
                fingerprint: fingerprint.clone(),
                first_seen: *first_seen,
            };
            serde_json::to_writer(&mut tmp, &entry)?;
            tmp.write_all(b"\n")
                .map_err(|e| ScanError::Storage(format!("writing {}: {}", self.path.display(), e)))?;
        }
        tmp.persist(&self.path)
            .map_err(|e| ScanError::Storage(format!("replacing {}: {}", self.path.display(), e)))?;

        debug!(
            "Persisted {} seen fingerprints to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
