//! TreeWalker - the public entry point for local walks

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};
use crate::output::LineFormatter;
use crate::stats::{DisplayStatistics, JsonStatistics, Statistics};

use super::config::WalkerConfig;
use super::json_types::JsonTree;
use super::parallel::Inspector;
use super::sink::{JsonSink, LineSink, TreeSink};
use super::traversal::{DepthGate, Strategies, walk};

/// Walks one local directory. Every build starts from fresh statistics, so a
/// walker can be reused and yields the same result on an unchanged tree.
pub struct TreeWalker {
    root: PathBuf,
    config: WalkerConfig,
    inspector: Inspector,
    stats: DisplayStatistics,
    stop: Arc<AtomicBool>,
}

impl TreeWalker {
    /// Create a walker for `root`, which must be an existing directory.
    pub fn new(root: impl Into<PathBuf>, config: WalkerConfig) -> Result<Self> {
        let root = root.into();
        let meta = root
            .metadata()
            .map_err(|_| Error::NotFound { path: root.clone() })?;
        if !meta.is_dir() {
            return Err(Error::NotADirectory { path: root });
        }

        let inspector = Inspector::from_workers(config.parallel_workers, config.parallel_threshold);
        Ok(Self {
            root,
            config,
            inspector,
            stats: DisplayStatistics::default(),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Number of threads used for file inspection (1 when sequential).
    pub fn worker_count(&self) -> usize {
        self.inspector.worker_count()
    }

    /// Flag that ends the running walk early when set from another thread.
    /// Each build clears it before starting.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run one walk into an arbitrary sink.
    pub fn walk<S: TreeSink>(&mut self, sink: &mut S) {
        self.stats.reset();
        self.stop.store(false, Ordering::Relaxed);
        let strategies = Strategies {
            show_hidden: self.config.show_hidden,
            filters: &self.config.filters,
            depth: DepthGate::new(self.config.max_depth),
            inspector: &self.inspector,
            size_format: self.config.size_format,
            stop: &self.stop,
        };
        walk(&self.root, &strategies, &mut self.stats, sink);
    }

    /// Build the annotated text tree, root marker first.
    pub fn build_lines(&mut self, formatter: LineFormatter) -> Vec<String> {
        let mut sink = LineSink::new(formatter);
        self.walk(&mut sink);
        sink.into_lines()
    }

    /// Build the nested JSON document.
    pub fn build_json(&mut self) -> JsonTree {
        let mut sink = JsonSink::new();
        self.walk(&mut sink);
        JsonTree {
            path: self.root.display().to_string(),
            name: String::new(),
            kind: "directory",
            children: sink.into_children(),
            statistics: JsonStatistics::from(&self.stats),
        }
    }

    /// Raw totals of the last build.
    pub fn statistics(&self) -> Statistics {
        self.stats.statistics()
    }

    /// Display counts of the last build.
    pub fn display_statistics(&self) -> &DisplayStatistics {
        &self.stats
    }
}
