// src/cache.rs
//
// Content-addressed announcement cache: one JSON file per fingerprint under
// the data directory. Presence of a file is the authoritative "already
// delivered" signal; entries are never updated or deleted by this process.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// On-disk record for one delivered announcement. Pretty-printed JSON so an
/// operator can inspect entries with `cat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub text: String,
    pub fetch_datetime: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache entry {fingerprint}: {source}")]
    Io {
        fingerprint: String,
        #[source]
        source: io::Error,
    },
    #[error("listing cache directory {dir}: {source}")]
    List {
        dir: String,
        #[source]
        source: io::Error,
    },
    #[error("cache entry {fingerprint}: {source}")]
    Json {
        fingerprint: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct AnnouncementCache {
    dir: PathBuf,
}

impl AnnouncementCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, fingerprint: &str) -> PathBuf {
        self.dir.join(fingerprint)
    }

    /// True iff an entry file exists for this fingerprint. A missing entry
    /// (or a missing directory) is an ordinary "not seen yet".
    pub fn exists(&self, fingerprint: &str) -> bool {
        self.entry_path(fingerprint).is_file()
    }

    /// Persist the entry for `fingerprint`. Written to a sibling temp file
    /// and renamed into place so a reader never observes a partial record.
    /// On any failure the entry must be treated as not committed.
    pub fn write(
        &self,
        fingerprint: &str,
        body_text: &str,
        fetch_datetime: &str,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry {
            text: body_text.to_string(),
            fetch_datetime: fetch_datetime.to_string(),
        };
        let bytes = serde_json::to_vec_pretty(&entry).map_err(|source| CacheError::Json {
            fingerprint: fingerprint.to_string(),
            source,
        })?;

        let final_path = self.entry_path(fingerprint);
        let tmp_path = self.dir.join(format!("{fingerprint}.tmp"));

        let io_err = |source| CacheError::Io {
            fingerprint: fingerprint.to_string(),
            source,
        };
        fs::write(&tmp_path, &bytes).map_err(io_err)?;
        fs::rename(&tmp_path, &final_path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            CacheError::Io {
                fingerprint: fingerprint.to_string(),
                source,
            }
        })?;
        Ok(())
    }

    /// Read an entry back. Used by tests and operator tooling; the pipeline
    /// itself only ever checks existence.
    pub fn read(&self, fingerprint: &str) -> Result<CacheEntry, CacheError> {
        let raw = fs::read_to_string(self.entry_path(fingerprint)).map_err(|source| {
            CacheError::Io {
                fingerprint: fingerprint.to_string(),
                source,
            }
        })?;
        serde_json::from_str(&raw).map_err(|source| CacheError::Json {
            fingerprint: fingerprint.to_string(),
            source,
        })
    }

    /// Most recent modification time across all entries, or `UNIX_EPOCH`
    /// when the directory is empty or does not exist yet. The result feeds
    /// the next cycle's `If-Modified-Since` header, so it is recomputed from
    /// disk every time rather than cached in memory.
    pub fn last_modified_time(&self) -> Result<SystemTime, CacheError> {
        if !self.dir.exists() {
            return Ok(UNIX_EPOCH);
        }
        let entries = fs::read_dir(&self.dir).map_err(|source| CacheError::List {
            dir: self.dir.display().to_string(),
            source,
        })?;

        let mut latest = UNIX_EPOCH;
        for entry in entries.flatten() {
            let Ok(meta) = entry.metadata() else { continue };
            if !meta.is_file() {
                continue;
            }
            if let Ok(modified) = meta.modified() {
                if modified > latest {
                    latest = modified;
                }
            }
        }
        Ok(latest)
    }
}
