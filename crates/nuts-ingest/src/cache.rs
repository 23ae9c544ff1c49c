//! On-disk cache of downloaded provider files.
//!
//! Entries are keyed by the SHA-256 of the full URL, with the URL's file
//! name appended for readability. Writes go through a temp file and a
//! rename so an interrupted download never leaves a truncated entry.
//!
//! An entry's age is its file modification time.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};

use crate::error::{IngestError, Result};

/// Directory-backed download cache.
#[derive(Debug, Clone)]
pub struct DownloadCache {
    dir: PathBuf,
}

impl DownloadCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the cache entry for a URL (whether or not it exists).
    pub fn entry_path(&self, url: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(url.as_bytes()));
        let name = url_file_name(url);
        self.dir.join(format!("{}-{}", &digest[..16], name))
    }

    /// Read a cached body, if present and not older than `max_age`.
    ///
    /// With `max_age` of `None` any entry is served.
    pub fn get(&self, url: &str, max_age: Option<Duration>) -> Result<Option<Vec<u8>>> {
        let path = self.entry_path(url);
        if let Some(max_age) = max_age {
            let Some(age) = entry_age(&path)? else {
                return Ok(None);
            };
            if age > max_age {
                tracing::info!(
                    path = %path.display(),
                    age_hours = age.as_secs() / 3600,
                    "cached download is stale"
                );
                return Ok(None);
            }
        }
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IngestError::Cache {
                operation: "read",
                path,
                source: e,
            }),
        }
    }

    /// Store a body for a URL, replacing any previous entry.
    pub fn put(&self, url: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| IngestError::Cache {
            operation: "create directory",
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.entry_path(url);
        let temp_path = path.with_extension("part");

        let mut file = File::create(&temp_path).map_err(|e| IngestError::Cache {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(bytes).map_err(|e| IngestError::Cache {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| IngestError::Cache {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;
        drop(file);

        fs::rename(&temp_path, &path).map_err(|e| IngestError::Cache {
            operation: "rename",
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "cached download");
        Ok(path)
    }
}

/// Time since the entry was last written, `None` when it does not exist.
///
/// A modification time in the future counts as age zero.
fn entry_age(path: &Path) -> Result<Option<Duration>> {
    let modified = match fs::metadata(path).and_then(|metadata| metadata.modified()) {
        Ok(modified) => modified,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(IngestError::Cache {
                operation: "stat",
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    Ok(Some(
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO),
    ))
}

/// Last path segment of a URL without query string, sanitized for use in a
/// file name.
fn url_file_name(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("download");
    let cleaned: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}
