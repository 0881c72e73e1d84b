//! `walkdir`-backed stat collector.

use std::path::Path;
use std::time::Instant;

use filemod_worker::{FileRecord, ScanError, StatCollector};
use tracing::{debug, error};
use walkdir::WalkDir;

use crate::config::CollectorConfig;

/// Collects metadata for every non-directory entry under a root.
#[derive(Debug, Clone, Default)]
pub struct WalkDirCollector {
    config: CollectorConfig,
}

impl WalkDirCollector {
    /// Create a new collector.
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// Get the walk configuration.
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    fn walk(&self, directory: &Path) -> Result<Vec<FileRecord>, ScanError> {
        let start = Instant::now();
        let mut records = Vec::new();

        let walker = WalkDir::new(directory)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(directory).to_path_buf();
                ScanError::Walk {
                    path,
                    source: e.into(),
                }
            })?;

            // Only files are reported
            if entry.file_type().is_dir() {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| ScanError::Walk {
                path: entry.path().to_path_buf(),
                source: e.into(),
            })?;
            records.push(FileRecord::from_metadata(entry.path(), &metadata)?);
        }

        debug!(
            "Scanned {} files under {} in {:?}",
            records.len(),
            directory.display(),
            start.elapsed()
        );

        Ok(records)
    }
}

impl StatCollector for WalkDirCollector {
    fn file_stats(&self, directory: &Path) -> Result<Vec<FileRecord>, ScanError> {
        self.walk(directory).inspect_err(|e| {
            error!(directory = %directory.display(), error = %e, "failed to walk directory");
        })
    }
}
