//! # Stat Collector
//!
//! Walks a directory tree and reports size and modification time for every
//! file in it. This is the production [`StatCollector`] used by the worker
//! subsystem's scan trigger and by on-demand `/file-stats` requests.
//!
//! ```text
//! CollectorConfig ──► WalkDirCollector ──► Vec<FileRecord>
//! ```
//!
//! Any walk error aborts the scan, so the worker keeps its previous
//! snapshot instead of publishing a partial one.
//!
//! [`StatCollector`]: filemod_worker::StatCollector

pub mod config;
pub mod walker;

pub use config::CollectorConfig;
pub use walker::WalkDirCollector;
