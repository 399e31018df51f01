//! Directory tree walking logic
//!
//! One traversal (`traversal::walk`) serves every output mode. What differs
//! between modes is passed in as strategies:
//!
//! - `FilterSet`: which files are shown
//! - `DepthGate`: which directories are expanded
//! - `Inspector`: sequential or pooled metadata lookups
//! - `TreeSink`: annotated lines (`LineSink`) or nested nodes (`JsonSink`)
//!
//! `TreeWalker` wires these together from a `WalkerConfig`.

mod config;
mod filter;
mod json_types;
mod parallel;
mod sink;
mod traversal;
mod walker;

pub use config::{DEFAULT_PARALLEL_THRESHOLD, WalkerConfig};
pub use filter::{Comparison, Filter, FilterSet, parse_date, parse_size, wildcard_to_regex};
pub use json_types::{JsonTree, NodeInfo, TreeNode};
pub use parallel::Inspector;
pub use sink::{
    Branch, DirectoryState, JsonSink, LineSink, TREE_BRANCH, TREE_LAST_BRANCH, TREE_SPACE,
    TREE_VERTICAL, TreeSink,
};
pub use traversal::{DepthGate, Strategies, walk};
pub use walker::TreeWalker;
