//! The stat collector seam.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ScanError;
use crate::record::FileRecord;

/// Produces file metadata for a directory.
///
/// Implementations are synchronous and may block on the filesystem, so the
/// worker always calls them on the blocking thread pool.
pub trait StatCollector: Send + Sync {
    /// Collect a record for every file under `directory`.
    fn file_stats(&self, directory: &Path) -> Result<Vec<FileRecord>, ScanError>;
}

impl<F> StatCollector for F
where
    F: Fn(&Path) -> Result<Vec<FileRecord>, ScanError> + Send + Sync,
{
    fn file_stats(&self, directory: &Path) -> Result<Vec<FileRecord>, ScanError> {
        self(directory)
    }
}

/// Run `collector` on the blocking pool and wait for it.
pub async fn collect(
    collector: Arc<dyn StatCollector>,
    directory: PathBuf,
) -> Result<Vec<FileRecord>, ScanError> {
    tokio::task::spawn_blocking(move || collector.file_stats(&directory))
        .await
        .map_err(|e| ScanError::Aborted(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_collect_runs_closure() {
        let collector: Arc<dyn StatCollector> =
            Arc::new(|dir: &Path| -> Result<Vec<FileRecord>, ScanError> {
                Ok(vec![FileRecord::new(dir.join("a.txt"), Utc::now(), 1)])
            });

        let records = collect(collector, PathBuf::from("/test")).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, Path::new("/test/a.txt"));
    }

    #[tokio::test]
    async fn test_collect_reports_panic() {
        let collector: Arc<dyn StatCollector> =
            Arc::new(|_: &Path| -> Result<Vec<FileRecord>, ScanError> { panic!("boom") });

        let result = collect(collector, PathBuf::from("/test")).await;
        assert!(matches!(result, Err(ScanError::Aborted(_))));
    }
}
