//! Canopy - annotated directory trees for local folders and GitHub repositories

pub mod entry;
pub mod error;
pub mod output;
pub mod remote;
pub mod stats;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use entry::{EntryDescriptor, EntryKind, FileClass, SizeFormat, inspect};
pub use error::{Error, Result};
pub use output::{
    LineFormatter, OutputConfig, SummaryContext, write_json, write_lines, write_summary,
};
pub use remote::{GitHubTreeBuilder, HttpClient, RemoteConfig, RemoteEntry, RepoLocation};
pub use stats::{DisplayStatistics, JsonStatistics, Statistics};
pub use tree::{Filter, FilterSet, JsonTree, TreeNode, TreeSink, TreeWalker, WalkerConfig};
