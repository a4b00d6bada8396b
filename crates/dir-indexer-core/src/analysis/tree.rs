use crate::model::{root_display_name, FileRecord};
use ahash::AHashMap;
use serde::Serialize;
use std::path::Path;

/// One folder of the in-memory hierarchy. Parents own their children; the
/// tree is only ever navigated from the root downwards.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<'a> {
    pub name: String,
    /// Relative path; empty for the root.
    pub path: String,
    /// Files in this folder and all descendants.
    pub file_count: u64,
    /// Bytes in this folder and all descendants.
    pub total_size: u64,
    /// Files directly inside this folder, in scan order.
    pub files: Vec<&'a FileRecord>,
    /// Subfolders in order of first encounter.
    children: Vec<TreeNode<'a>>,
    #[serde(skip)]
    child_index: AHashMap<String, usize>,
}

impl<'a> TreeNode<'a> {
    fn new(name: String, path: String) -> Self {
        Self {
            name,
            path,
            file_count: 0,
            total_size: 0,
            files: Vec::new(),
            children: Vec::new(),
            child_index: AHashMap::new(),
        }
    }

    pub fn children(&self) -> &[TreeNode<'a>] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&TreeNode<'a>> {
        self.child_index.get(name).map(|&i| &self.children[i])
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Resolve a `/`-separated relative path; the empty string is this node.
    pub fn find(&self, path: &str) -> Option<&TreeNode<'a>> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('/')
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Depth-first visit of this node and every descendant.
    pub fn walk<'t, F: FnMut(&'t TreeNode<'a>)>(&'t self, visit: &mut F) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    fn child_or_insert(&mut self, name: &str) -> &mut TreeNode<'a> {
        let index = match self.child_index.get(name) {
            Some(&i) => i,
            None => {
                let path = if self.path.is_empty() {
                    name.to_string()
                } else {
                    format!("{}/{}", self.path, name)
                };
                self.children.push(TreeNode::new(name.to_string(), path));
                let i = self.children.len() - 1;
                self.child_index.insert(name.to_string(), i);
                i
            }
        };
        &mut self.children[index]
    }
}

/// Build the folder hierarchy for `files` in one pass.
///
/// Folders are created lazily on first reference. Every folder on the way
/// from the root to a file's parent, root included, gains that file's count
/// and size, so recursive aggregates are correct without a second pass.
pub fn build_tree<'a>(root_path: &Path, files: &'a [FileRecord]) -> TreeNode<'a> {
    let mut root = TreeNode::new(
        root_display_name(&root_path.to_string_lossy()),
        String::new(),
    );

    for file in files {
        let mut node = &mut root;
        node.file_count += 1;
        node.total_size += file.size_bytes;

        if !file.directory.is_empty() {
            for segment in file.directory.split('/') {
                node = node.child_or_insert(segment);
                node.file_count += 1;
                node.total_size += file.size_bytes;
            }
        }
        node.files.push(file);
    }

    root
}
