//! Lazily loaded mirror of the workspace directory tree.
//!
//! Nodes live in a slotmap arena and are indexed by path, so replacing the
//! listing of one directory is a hash lookup plus a rebuild of its children.
//! Child order is whatever the file adapter reported; the tree never sorts.

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, SlotMap};
use std::path::{Path, PathBuf};

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Dir,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

/// Owned snapshot of a node, as produced by listings and returned by lookups.
///
/// `children == None` means the directory was never listed;
/// `Some(vec![])` with `is_loaded` is a directory that is really empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub children: Option<Vec<TreeNode>>,
    pub is_loaded: bool,
}

impl TreeNode {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            path,
            is_dir: false,
            children: None,
            is_loaded: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            path,
            is_dir: true,
            children: None,
            is_loaded: false,
        }
    }

    /// Marks the directory as loaded with the given listing.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children);
        self.is_loaded = true;
        self
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeRow {
    pub id: NodeId,
    pub path: PathBuf,
    pub depth: u16,
    pub name: String,
    pub is_dir: bool,
    pub is_expanded: bool,
    pub load_state: LoadState,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: String,
    path: PathBuf,
    children: Option<Vec<NodeId>>,
    load_state: LoadState,
}

#[derive(Debug, Default, Clone)]
pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    id_by_path: FxHashMap<PathBuf, NodeId>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<TreeNode>) -> Self {
        let mut tree = Self::new();
        tree.set_tree(nodes);
        tree
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes currently held, at any depth.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Replaces the whole tree.
    pub fn set_tree(&mut self, nodes: Vec<TreeNode>) {
        self.arena.clear();
        self.id_by_path.clear();
        self.roots = nodes
            .into_iter()
            .map(|node| self.insert_snapshot(node))
            .collect();
    }

    /// Replaces the top-level listing (a reload of the workspace root).
    pub fn update_roots(&mut self, children: Vec<TreeNode>) {
        let old = std::mem::take(&mut self.roots);
        self.roots = self.rebuild_children(old, children);
    }

    /// Replaces the children of the directory at `path` and marks it loaded.
    ///
    /// Returns `false` and leaves the tree untouched when `path` is not a
    /// directory in the tree; a listing that arrives after its directory
    /// disappeared is simply dropped.
    pub fn update_subtree(&mut self, path: &Path, children: Vec<TreeNode>) -> bool {
        let Some(id) = self.dir_id(path) else {
            tracing::debug!(path = %path.display(), "stale subtree update ignored");
            return false;
        };

        let old = self
            .arena
            .get_mut(id)
            .and_then(|node| node.children.take())
            .unwrap_or_default();
        let rebuilt = self.rebuild_children(old, children);
        if let Some(node) = self.arena.get_mut(id) {
            node.children = Some(rebuilt);
            node.load_state = LoadState::Loaded;
        }
        true
    }

    /// Incoming directories that arrive without a listing keep the loaded
    /// subtree of the node they replace.
    fn rebuild_children(&mut self, old: Vec<NodeId>, incoming: Vec<TreeNode>) -> Vec<NodeId> {
        let mut reusable: FxHashMap<PathBuf, NodeId> = FxHashMap::default();
        for &id in &old {
            if let Some(node) = self.arena.get(id) {
                if node.kind == NodeKind::Dir && node.children.is_some() {
                    reusable.insert(node.path.clone(), id);
                }
            }
        }

        let mut kept: FxHashSet<NodeId> = FxHashSet::default();
        for child in &incoming {
            if child.is_dir && child.children.is_none() {
                if let Some(&id) = reusable.get(&child.path) {
                    kept.insert(id);
                }
            }
        }

        for id in old {
            if !kept.contains(&id) {
                self.remove_subtree(id);
            }
        }

        incoming
            .into_iter()
            .map(|child| {
                let reused = (child.is_dir && child.children.is_none())
                    .then(|| reusable.remove(&child.path))
                    .flatten()
                    .filter(|id| kept.contains(id));
                match reused {
                    Some(id) => {
                        if let Some(node) = self.arena.get_mut(id) {
                            node.name = child.name;
                        }
                        id
                    }
                    None => self.insert_snapshot(child),
                }
            })
            .collect()
    }

    fn insert_snapshot(&mut self, snapshot: TreeNode) -> NodeId {
        let kind = if snapshot.is_dir {
            NodeKind::Dir
        } else {
            NodeKind::File
        };
        let load_state = if snapshot.is_loaded || kind == NodeKind::File {
            LoadState::Loaded
        } else {
            LoadState::NotLoaded
        };
        let path = snapshot.path;
        let id = self.arena.insert(Node {
            kind,
            name: snapshot.name,
            path: path.clone(),
            children: None,
            load_state,
        });
        self.id_by_path.insert(path, id);

        if let Some(children) = snapshot.children {
            let child_ids = children
                .into_iter()
                .map(|child| self.insert_snapshot(child))
                .collect();
            if let Some(node) = self.arena.get_mut(id) {
                node.children = Some(child_ids);
            }
        }
        id
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.arena.remove(id) else {
                continue;
            };
            if self.id_by_path.get(&node.path) == Some(&id) {
                self.id_by_path.remove(&node.path);
            }
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
    }

    pub fn id(&self, path: &Path) -> Option<NodeId> {
        self.id_by_path.get(path).copied()
    }

    fn dir_id(&self, path: &Path) -> Option<NodeId> {
        self.id(path)
            .filter(|id| matches!(self.arena.get(*id), Some(node) if node.kind == NodeKind::Dir))
    }

    pub fn path(&self, id: NodeId) -> Option<&Path> {
        self.arena.get(id).map(|node| node.path.as_path())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.id_by_path.contains_key(path)
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.dir_id(path).is_some()
    }

    pub fn load_state(&self, path: &Path) -> Option<LoadState> {
        self.id(path)
            .and_then(|id| self.arena.get(id))
            .map(|node| node.load_state)
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.load_state(path) == Some(LoadState::Loaded)
    }

    /// Whether the directory at `path` holds a listing, even a stale one.
    pub fn has_listing(&self, path: &Path) -> bool {
        self.dir_id(path)
            .and_then(|id| self.arena.get(id))
            .is_some_and(|node| node.children.is_some())
    }

    /// Returns `false` if `path` is not a directory in the tree.
    pub fn set_load_state(&mut self, path: &Path, state: LoadState) -> bool {
        let Some(id) = self.dir_id(path) else {
            return false;
        };
        if let Some(node) = self.arena.get_mut(id) {
            node.load_state = state;
        }
        true
    }

    pub fn node(&self, path: &Path) -> Option<TreeNode> {
        self.id(path).and_then(|id| self.snapshot(id))
    }

    pub fn nodes(&self) -> Vec<TreeNode> {
        self.roots
            .iter()
            .filter_map(|&id| self.snapshot(id))
            .collect()
    }

    fn snapshot(&self, id: NodeId) -> Option<TreeNode> {
        let node = self.arena.get(id)?;
        let children = node.children.as_ref().map(|ids| {
            ids.iter()
                .filter_map(|&child| self.snapshot(child))
                .collect()
        });
        Some(TreeNode {
            name: node.name.clone(),
            path: node.path.clone(),
            is_dir: node.kind == NodeKind::Dir,
            children,
            is_loaded: node.kind == NodeKind::Dir && node.load_state == LoadState::Loaded,
        })
    }

    fn walk(&self) -> impl Iterator<Item = &Node> + '_ {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let node = self.arena.get(id)?;
            if let Some(children) = &node.children {
                stack.extend(children.iter().rev().copied());
            }
            Some(node)
        })
    }

    /// Every file currently held, in pre-order.
    pub fn files(&self) -> Vec<PathBuf> {
        self.walk()
            .filter(|node| node.kind == NodeKind::File)
            .map(|node| node.path.clone())
            .collect()
    }

    /// Every directory whose listing has been loaded, in pre-order.
    pub fn loaded_dirs(&self) -> Vec<PathBuf> {
        self.walk()
            .filter(|node| node.kind == NodeKind::Dir && node.load_state == LoadState::Loaded)
            .map(|node| node.path.clone())
            .collect()
    }

    /// Pre-order projection of the visible nodes.
    ///
    /// A directory's children are visible only when it is expanded and has
    /// been listed.
    pub fn flatten(&self, expanded: &[PathBuf]) -> Vec<FileTreeRow> {
        let expanded: FxHashSet<&Path> = expanded.iter().map(PathBuf::as_path).collect();
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = self.roots.iter().rev().map(|&id| (id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let is_dir = node.kind == NodeKind::Dir;
            let is_expanded = is_dir && expanded.contains(node.path.as_path());
            result.push(FileTreeRow {
                id,
                path: node.path.clone(),
                depth,
                name: node.name.clone(),
                is_dir,
                is_expanded,
                load_state: node.load_state,
            });

            if is_expanded {
                if let Some(children) = &node.children {
                    for &child in children.iter().rev() {
                        stack.push((child, depth.saturating_add(1)));
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
