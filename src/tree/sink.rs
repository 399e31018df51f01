//! Traversal sinks: flat annotated lines or nested JSON nodes

use std::path::Path;

use crate::entry::EntryDescriptor;
use crate::output::LineFormatter;

use super::json_types::{NodeInfo, TreeNode};

pub const TREE_BRANCH: &str = "├── ";
pub const TREE_LAST_BRANCH: &str = "└── ";
pub const TREE_VERTICAL: &str = "│   ";
pub const TREE_SPACE: &str = "    ";

/// Position of an entry among its siblings.
#[derive(Debug, Clone, Copy)]
pub struct Branch<'a> {
    /// Accumulated indentation of the parent.
    pub prefix: &'a str,
    pub is_last: bool,
}

impl Branch<'_> {
    pub fn connector(&self) -> &'static str {
        if self.is_last {
            TREE_LAST_BRANCH
        } else {
            TREE_BRANCH
        }
    }

    /// Calculate the prefix for child entries
    pub fn child_prefix(&self) -> String {
        let pad = if self.is_last { TREE_SPACE } else { TREE_VERTICAL };
        format!("{}{}", self.prefix, pad)
    }
}

/// What the walk did with a directory after emitting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryState {
    /// Children follow, closed by `leave_directory`.
    Expanded,
    /// The depth limit stopped the walk here; no children follow.
    ContentsHidden,
}

/// Receives entries in display order.
pub trait TreeSink {
    fn begin(&mut self, root: &Path);

    fn directory(&mut self, entry: &EntryDescriptor, branch: Branch<'_>, state: DirectoryState);

    fn file(&mut self, entry: &EntryDescriptor, branch: Branch<'_>);

    /// Called once after the last child of every `Expanded` directory.
    fn leave_directory(&mut self) {}
}

/// Collects one annotated text line per entry.
pub struct LineSink {
    formatter: LineFormatter,
    lines: Vec<String>,
}

impl LineSink {
    pub fn new(formatter: LineFormatter) -> Self {
        Self {
            formatter,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl TreeSink for LineSink {
    fn begin(&mut self, _root: &Path) {
        self.lines.clear();
        self.lines.push(self.formatter.root_marker());
    }

    fn directory(&mut self, entry: &EntryDescriptor, branch: Branch<'_>, state: DirectoryState) {
        let text = match state {
            DirectoryState::Expanded => self.formatter.format(entry),
            DirectoryState::ContentsHidden => self.formatter.format_contents_hidden(entry),
        };
        self.lines
            .push(format!("{}{}{}", branch.prefix, branch.connector(), text));
    }

    fn file(&mut self, entry: &EntryDescriptor, branch: Branch<'_>) {
        self.lines.push(format!(
            "{}{}{}",
            branch.prefix,
            branch.connector(),
            self.formatter.format(entry)
        ));
    }
}

/// Builds nested `TreeNode`s. Each expanded directory collects its children
/// on a stack until the walk leaves it.
#[derive(Default)]
pub struct JsonSink {
    open: Vec<(NodeInfo, Vec<TreeNode>)>,
    root_children: Vec<TreeNode>,
}

impl JsonSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: TreeNode) {
        match self.open.last_mut() {
            Some((_, children)) => children.push(node),
            None => self.root_children.push(node),
        }
    }

    fn close(&mut self) {
        if let Some((info, children)) = self.open.pop() {
            self.push(TreeNode::Directory {
                info,
                contents_hidden: false,
                children,
            });
        }
    }

    /// Finish and return the children of the root.
    pub fn into_children(mut self) -> Vec<TreeNode> {
        while !self.open.is_empty() {
            self.close();
        }
        self.root_children
    }
}

impl TreeSink for JsonSink {
    fn begin(&mut self, _root: &Path) {
        self.open.clear();
        self.root_children.clear();
    }

    fn directory(&mut self, entry: &EntryDescriptor, _branch: Branch<'_>, state: DirectoryState) {
        let info = NodeInfo::from(entry);
        match state {
            DirectoryState::Expanded => self.open.push((info, Vec::new())),
            DirectoryState::ContentsHidden => self.push(TreeNode::Directory {
                info,
                contents_hidden: true,
                children: Vec::new(),
            }),
        }
    }

    fn file(&mut self, entry: &EntryDescriptor, _branch: Branch<'_>) {
        self.push(TreeNode::File {
            info: NodeInfo::from(entry),
        });
    }

    fn leave_directory(&mut self) {
        self.close();
    }
}
