//! Configuration for directory walks.

use serde::{Deserialize, Serialize};

/// How the collector walks a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl CollectorConfig {
    /// Create a config that walks the whole tree without following links.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Enable following symbolic links.
    pub fn follow_symlinks(mut self) -> Self {
        self.follow_symlinks = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collector_config_creation() {
        let config = CollectorConfig::new().with_max_depth(2).follow_symlinks();

        assert_eq!(config.max_depth, Some(2));
        assert!(config.follow_symlinks);
    }

    #[test]
    fn test_default_walks_everything() {
        let config = CollectorConfig::default();

        assert_eq!(config.max_depth, None);
        assert!(!config.follow_symlinks);
    }
}
