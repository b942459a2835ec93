//! Data models.

pub mod file_tree;

pub use file_tree::{display_name, FileTree, FileTreeRow, LoadState, NodeId, NodeKind, TreeNode};
