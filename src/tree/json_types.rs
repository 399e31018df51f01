//! JSON serialization types for tree output

use serde::Serialize;

use crate::entry::EntryDescriptor;
use crate::stats::JsonStatistics;

/// Metadata shared by file and directory nodes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub name: String,
    pub size: u64,
    pub size_formatted: String,
    pub last_modified: String,
    pub permissions: String,
    pub is_hidden: bool,
    pub is_executable: bool,
    pub is_symlink: bool,
}

impl From<&EntryDescriptor> for NodeInfo {
    fn from(entry: &EntryDescriptor) -> Self {
        Self {
            name: entry.name.clone(),
            size: entry.size,
            size_formatted: entry.size_formatted.clone(),
            last_modified: entry.last_modified.clone(),
            permissions: entry.permissions.clone(),
            is_hidden: entry.is_hidden,
            is_executable: entry.is_executable,
            is_symlink: entry.is_symlink,
        }
    }
}

/// One node of the JSON tree. Directories own their children.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    File {
        #[serde(flatten)]
        info: NodeInfo,
    },
    Directory {
        #[serde(flatten)]
        info: NodeInfo,
        /// Set when the depth limit kept the walk from listing this directory.
        #[serde(rename = "contentsHidden", skip_serializing_if = "std::ops::Not::not")]
        contents_hidden: bool,
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::File { info } => &info.name,
            TreeNode::Directory { info, .. } => &info.name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Directory { .. })
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::File { .. } => &[],
            TreeNode::Directory { children, .. } => children,
        }
    }
}

/// Root of the JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonTree {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub children: Vec<TreeNode>,
    pub statistics: JsonStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;

    fn descriptor(name: &str, kind: EntryKind, size: u64) -> EntryDescriptor {
        EntryDescriptor {
            name: name.to_string(),
            kind,
            size,
            size_formatted: format!("{} B", size),
            last_modified: "2024-01-01 00:00:00".to_string(),
            permissions: "rw-r--r--".to_string(),
            is_hidden: false,
            is_executable: false,
            is_symlink: false,
        }
    }

    #[test]
    fn test_file_node_shape() {
        let node = TreeNode::File {
            info: NodeInfo::from(&descriptor("f.txt", EntryKind::File, 10)),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["name"], "f.txt");
        assert_eq!(json["size"], 10);
        assert_eq!(json["lastModified"], "2024-01-01 00:00:00");
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_directory_node_shape() {
        let node = TreeNode::Directory {
            info: NodeInfo::from(&descriptor("sub", EntryKind::Directory, 0)),
            contents_hidden: false,
            children: Vec::new(),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "directory");
        assert_eq!(json["children"], serde_json::json!([]));
        assert!(json.get("contentsHidden").is_none());
        assert!(node.is_dir());
        assert_eq!(node.name(), "sub");
    }
}
