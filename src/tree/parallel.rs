//! Metadata inspection strategies
//!
//! Directory recursion always stays on the walker thread. Only the per-file
//! `inspect` calls of one directory may be fanned out to a rayon pool, and
//! the indexed collect keeps results in sibling order, so the output is the
//! same as a sequential walk.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::entry::{EntryDescriptor, SizeFormat, inspect};
use crate::error::Result;

/// How file descriptors are produced for one directory.
pub enum Inspector {
    Sequential,
    Pooled {
        pool: rayon::ThreadPool,
        threshold: usize,
    },
}

impl Inspector {
    /// Build a pooled inspector. `workers == 0` uses one thread per available core.
    pub fn pooled(workers: usize, threshold: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("canopy-inspect-{}", i))
            .build()?;
        log::debug!("inspecting with {} worker threads", pool.current_num_threads());
        Ok(Inspector::Pooled { pool, threshold })
    }

    /// Build the inspector for a worker setting, falling back to a sequential
    /// one if the pool cannot be created.
    pub fn from_workers(workers: Option<usize>, threshold: usize) -> Self {
        match workers {
            None => Inspector::Sequential,
            Some(n) => Self::pooled(n, threshold).unwrap_or_else(|e| {
                log::warn!("{}, inspecting sequentially", e);
                Inspector::Sequential
            }),
        }
    }

    pub fn worker_count(&self) -> usize {
        match self {
            Inspector::Sequential => 1,
            Inspector::Pooled { pool, .. } => pool.current_num_threads(),
        }
    }

    /// Inspect `paths`, returning descriptors in the same order.
    ///
    /// Once `stop` is set, remaining paths are skipped and the result is
    /// truncated.
    pub fn inspect_all(
        &self,
        paths: &[PathBuf],
        size_format: SizeFormat,
        stop: &AtomicBool,
    ) -> Vec<EntryDescriptor> {
        match self {
            Inspector::Pooled { pool, threshold } if paths.len() > *threshold => {
                let results: Vec<Option<EntryDescriptor>> = pool.install(|| {
                    paths
                        .par_iter()
                        .map(|path| {
                            if stop.load(Ordering::Relaxed) {
                                None
                            } else {
                                Some(inspect(path, size_format))
                            }
                        })
                        .collect()
                });
                results.into_iter().map_while(|d| d).collect()
            }
            _ => paths
                .iter()
                .map_while(|path| {
                    if stop.load(Ordering::Relaxed) {
                        None
                    } else {
                        Some(inspect(path, size_format))
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_files(count: usize) -> (TempDir, Vec<PathBuf>) {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..count)
            .map(|i| {
                let path = dir.path().join(format!("file{:02}.txt", i));
                fs::write(&path, "x".repeat(i)).unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    #[test]
    fn test_pooled_preserves_order() {
        let (_dir, paths) = sample_files(40);
        let stop = AtomicBool::new(false);
        let sequential = Inspector::Sequential.inspect_all(&paths, SizeFormat::Compact, &stop);
        let pooled = Inspector::pooled(4, 10)
            .unwrap()
            .inspect_all(&paths, SizeFormat::Compact, &stop);
        assert_eq!(sequential, pooled);
        assert_eq!(pooled[7].name, "file07.txt");
        assert_eq!(pooled[7].size, 7);
    }

    #[test]
    fn test_auto_worker_count() {
        let inspector = Inspector::from_workers(Some(0), 10);
        assert!(inspector.worker_count() >= 1);
        assert_eq!(Inspector::from_workers(None, 10).worker_count(), 1);
    }

    #[test]
    fn test_stop_flag_skips_remaining() {
        let (_dir, paths) = sample_files(5);
        let stop = AtomicBool::new(true);
        let result = Inspector::Sequential.inspect_all(&paths, SizeFormat::Compact, &stop);
        assert!(result.is_empty());
    }
}
