//! File metadata records produced by a scan.

use std::fs::Metadata;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one file seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Full path to the file.
    pub path: PathBuf,

    /// When the file was last modified (RFC3339 on the wire).
    pub last_modified: DateTime<Utc>,

    /// File size in bytes.
    pub size: u64,
}

impl FileRecord {
    /// Create a record from its parts.
    pub fn new(path: impl Into<PathBuf>, last_modified: DateTime<Utc>, size: u64) -> Self {
        Self {
            path: path.into(),
            last_modified,
            size,
        }
    }

    /// Create a record from already-fetched metadata.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> std::io::Result<Self> {
        let modified = metadata.modified()?;
        Ok(Self::new(path, DateTime::<Utc>::from(modified), metadata.len()))
    }
}
