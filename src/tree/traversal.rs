//! The single traversal shared by every output mode.
//!
//! The walk keeps an explicit stack of open directories instead of recursing,
//! so the current depth is a field of the frame rather than a call frame. The
//! policies that vary between modes (hidden entries, filters, depth limit,
//! inspection strategy, sink) are bundled in `Strategies`.

use std::cmp::Ordering as CmpOrdering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::vec;

use crate::entry::{EntryDescriptor, EntryKind, SizeFormat, inspect, is_hidden_name};
use crate::stats::DisplayStatistics;

use super::filter::FilterSet;
use super::parallel::Inspector;
use super::sink::{Branch, DirectoryState, TreeSink};

/// Decides whether the children of a directory are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthGate {
    max_depth: Option<usize>,
}

impl DepthGate {
    /// `None` and `Some(0)` both mean unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            max_depth: max_depth.filter(|&max| max > 0),
        }
    }

    /// Whether a directory `depth` levels below the root is expanded.
    /// Children of the root are at depth 1.
    pub fn descends(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

/// Policies for one walk.
pub struct Strategies<'a> {
    pub show_hidden: bool,
    pub filters: &'a FilterSet,
    pub depth: DepthGate,
    pub inspector: &'a Inspector,
    pub size_format: SizeFormat,
    pub stop: &'a AtomicBool,
}

impl Strategies<'_> {
    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn keeps(&self, name: &std::ffi::OsStr) -> bool {
        self.show_hidden || !is_hidden_name(name)
    }
}

/// A listed child, in display order. Files are already inspected and filtered.
enum Child {
    Directory(PathBuf),
    File(EntryDescriptor),
}

/// An open directory whose remaining children have not been emitted yet.
struct Frame {
    children: vec::IntoIter<Child>,
    prefix: String,
    depth: usize,
    canonical: Option<PathBuf>,
}

/// Walk `root`, feeding `sink` in display order and tallying into `stats`.
///
/// Listing failures end the affected directory early; nothing here returns an
/// error once the root has been validated.
pub fn walk<S: TreeSink>(
    root: &Path,
    strategies: &Strategies<'_>,
    stats: &mut DisplayStatistics,
    sink: &mut S,
) {
    sink.begin(root);

    let mut stack = vec![Frame {
        children: collect_children(root, strategies, stats).into_iter(),
        prefix: String::new(),
        depth: 0,
        canonical: fs::canonicalize(root).ok(),
    }];

    while let Some(frame) = stack.last_mut() {
        if strategies.stopped() {
            log::debug!("walk of {} stopped early", root.display());
            break;
        }

        let Some(child) = frame.children.next() else {
            stack.pop();
            if !stack.is_empty() {
                sink.leave_directory();
            }
            continue;
        };

        let branch = Branch {
            prefix: &frame.prefix,
            is_last: frame.children.len() == 0,
        };
        let depth = frame.depth + 1;

        let path = match child {
            Child::File(entry) => {
                stats.display_file(entry.size);
                sink.file(&entry, branch);
                continue;
            }
            Child::Directory(path) => path,
        };

        let mut entry = inspect(&path, strategies.size_format);
        entry.kind = EntryKind::Directory;
        stats.record_directory();

        if !strategies.depth.descends(depth) {
            if has_listable_children(&path, strategies) {
                stats.record_hidden_by_depth();
                sink.directory(&entry, branch, DirectoryState::ContentsHidden);
            } else {
                sink.directory(&entry, branch, DirectoryState::Expanded);
                sink.leave_directory();
            }
            continue;
        }

        let prefix = branch.child_prefix();
        sink.directory(&entry, branch, DirectoryState::Expanded);

        let canonical = fs::canonicalize(&path).ok();
        if canonical.is_some() && stack.iter().any(|open| open.canonical == canonical) {
            log::debug!("not descending into {}: already an ancestor", path.display());
            sink.leave_directory();
            continue;
        }

        stack.push(Frame {
            children: collect_children(&path, strategies, stats).into_iter(),
            prefix,
            depth,
            canonical,
        });
    }

    // Close directories left open by an early stop.
    for _ in 1..stack.len() {
        sink.leave_directory();
    }
}

/// List, filter and order the children of `dir`.
fn collect_children(
    dir: &Path,
    strategies: &Strategies<'_>,
    stats: &mut DisplayStatistics,
) -> Vec<Child> {
    let entries = match fs::read_dir(dir).and_then(|rd| rd.collect::<io::Result<Vec<_>>>()) {
        Ok(entries) => entries,
        Err(err) => {
            log::debug!("skipping contents of {}: {}", dir.display(), err);
            return Vec::new();
        }
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries {
        if !strategies.keeps(&entry.file_name()) {
            stats.record_hidden_object();
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        } else {
            files.push(path);
        }
    }
    dirs.sort_by(by_name);
    files.sort_by(by_name);

    let descriptors = strategies
        .inspector
        .inspect_all(&files, strategies.size_format, strategies.stop);

    let mut children: Vec<Child> = dirs.into_iter().map(Child::Directory).collect();
    for descriptor in descriptors {
        stats.record_file(descriptor.size);
        if strategies.filters.matches(&descriptor) {
            children.push(Child::File(descriptor));
        }
    }
    children
}

fn by_name(a: &PathBuf, b: &PathBuf) -> CmpOrdering {
    a.file_name().cmp(&b.file_name())
}

fn has_listable_children(dir: &Path, strategies: &Strategies<'_>) -> bool {
    fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(|entry| entry.ok())
                .any(|entry| strategies.keeps(&entry.file_name()))
        })
        .unwrap_or(false)
}
