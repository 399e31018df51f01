//! Configuration types for tree walkers

use crate::entry::SizeFormat;

use super::filter::FilterSet;

/// Sibling file count above which metadata lookups go to the worker pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10;

/// Configuration for tree walking behavior.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Include entries whose name starts with a dot.
    pub show_hidden: bool,
    /// Stop descending below this many levels. `None` = unlimited.
    pub max_depth: Option<usize>,
    /// Files must pass every filter to be shown. Directories are never filtered.
    pub filters: FilterSet,
    /// Worker pool for file metadata lookups.
    /// None = sequential
    /// Some(0) = one worker per available core
    /// Some(N) = N workers
    pub parallel_workers: Option<usize>,
    pub parallel_threshold: usize,
    pub size_format: SizeFormat,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            max_depth: None,
            filters: FilterSet::new(),
            parallel_workers: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            size_format: SizeFormat::Compact,
        }
    }
}
