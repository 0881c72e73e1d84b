//! Holder of the most recent successful scan.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::record::FileRecord;

/// Lock-guarded cell holding the current snapshot.
///
/// Readers get a shared immutable view. A replace swaps the whole list, so a
/// reader sees either the old snapshot or the new one, never a mix.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<[FileRecord]>>,
}

impl SnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// Get the current snapshot.
    pub async fn read(&self) -> Arc<[FileRecord]> {
        Arc::clone(&*self.current.read().await)
    }

    /// Replace the snapshot wholesale.
    pub(crate) async fn replace(&self, records: Vec<FileRecord>) {
        let records: Arc<[FileRecord]> = Arc::from(records);
        *self.current.write().await = records;
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn record(path: &str) -> FileRecord {
        FileRecord::new(path, Utc::now(), 10)
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let store = SnapshotStore::new();
        assert!(store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_replace_is_wholesale() {
        let store = SnapshotStore::new();
        store.replace(vec![record("/a"), record("/b")]).await;
        store.replace(vec![record("/c")]).await;

        let snapshot = store.read().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].path.to_str(), Some("/c"));
    }

    #[tokio::test]
    async fn test_earlier_reads_are_stable() {
        let store = SnapshotStore::new();
        let first = vec![record("/a")];
        store.replace(first.clone()).await;

        let before = store.read().await;
        store.replace(Vec::new()).await;

        assert_eq!(&*before, first.as_slice());
        assert!(store.read().await.is_empty());
    }
}
