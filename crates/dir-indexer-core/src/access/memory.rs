use super::sort::{contains_folded, file_key, fold_case, folder_key, order_entries, EntryKind};
use super::{
    parent_of, DataAccess, Entry, EntryPage, FilePage, FileQuery, FolderEntry, FolderSummary,
    ListOptions, SearchHit, SEARCH_RESULT_LIMIT,
};
use crate::analysis::TreeNode;
use crate::error::Error;
use crate::model::FileRecord;

/// In-memory backend over a built tree and the scan records it was built
/// from.
pub struct TreeAccess<'a> {
    root: &'a TreeNode<'a>,
    /// Scan order, for the flat file table.
    files: &'a [FileRecord],
}

impl<'a> TreeAccess<'a> {
    pub fn new(root: &'a TreeNode<'a>, files: &'a [FileRecord]) -> Self {
        Self { root, files }
    }
}

fn folder_entry(node: &TreeNode<'_>) -> FolderEntry {
    FolderEntry {
        name: node.name.clone(),
        path: node.path.clone(),
        file_count: node.file_count,
        total_size: node.total_size,
    }
}

impl DataAccess for TreeAccess<'_> {
    fn root_name(&self) -> Result<String, Error> {
        Ok(self.root.name.clone())
    }

    fn get_folder(&self, path: &str) -> Result<Option<FolderSummary>, Error> {
        Ok(self.root.find(path).map(|node| FolderSummary {
            name: node.name.clone(),
            path: node.path.clone(),
            file_count: node.file_count,
            total_size: node.total_size,
            children: node.children().iter().map(|c| c.name.clone()).collect(),
        }))
    }

    fn list_entries(&self, path: &str, options: &ListOptions) -> Result<EntryPage, Error> {
        let node = match self.root.find(path) {
            Some(node) => node,
            None => return Ok(EntryPage::default()),
        };
        let needle = fold_case(&options.search);
        let filtered = !needle.is_empty();

        // Input order is folders in first-encounter order, then files in scan
        // order; the stable sort falls back to it for ties.
        let mut rows = Vec::with_capacity(node.children().len() + node.files.len());
        for child in node.children() {
            if filtered && !contains_folded(&child.name, &needle) {
                continue;
            }
            rows.push((
                EntryKind::Folder,
                folder_key(options.sort, &child.name, child.total_size),
                Entry::Folder(folder_entry(child)),
            ));
        }
        for &file in &node.files {
            if filtered
                && !contains_folded(&file.name, &needle)
                && !contains_folded(&file.extension, &needle)
            {
                continue;
            }
            rows.push((
                EntryKind::File,
                file_key(options.sort, file),
                Entry::File(file.clone()),
            ));
        }

        order_entries(&mut rows, options.ascending, options.folders_first);
        let total = rows.len();
        let items = rows
            .into_iter()
            .skip(options.offset)
            .take(options.limit)
            .map(|(_, _, entry)| entry)
            .collect();
        Ok(EntryPage { items, total })
    }

    fn search_global(&self, query: &str) -> Result<Vec<SearchHit>, Error> {
        let needle = fold_case(query);
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<(String, EntryKind, String, SearchHit)> = Vec::new();
        self.root.walk(&mut |node| {
            if !node.is_root() && contains_folded(&node.name, &needle) {
                let parent = parent_of(&node.path).to_string();
                hits.push((
                    parent.clone(),
                    EntryKind::Folder,
                    fold_case(&node.name),
                    SearchHit {
                        parent,
                        entry: Entry::Folder(folder_entry(node)),
                    },
                ));
            }
            for &file in &node.files {
                if contains_folded(&file.name, &needle) {
                    hits.push((
                        file.directory.clone(),
                        EntryKind::File,
                        fold_case(&file.name),
                        SearchHit {
                            parent: file.directory.clone(),
                            entry: Entry::File(file.clone()),
                        },
                    ));
                }
            }
        });

        hits.sort_by(|a, b| {
            (&a.0, a.1, &a.2, a.3.entry.name()).cmp(&(&b.0, b.1, &b.2, b.3.entry.name()))
        });
        Ok(hits
            .into_iter()
            .take(SEARCH_RESULT_LIMIT)
            .map(|(_, _, _, hit)| hit)
            .collect())
    }

    fn list_files(&self, query: &FileQuery) -> Result<FilePage, Error> {
        let needle = fold_case(&query.search);
        let extension = query.extension.as_deref().map(fold_case);

        let mut rows: Vec<_> = self
            .files
            .iter()
            .filter(|file| {
                needle.is_empty()
                    || contains_folded(&file.name, &needle)
                    || contains_folded(&file.directory, &needle)
            })
            .filter(|file| extension.as_deref().map_or(true, |ext| file.extension == ext))
            .map(|file| (EntryKind::File, file_key(query.sort, file), file))
            .collect();

        order_entries(&mut rows, query.ascending, true);
        let total = rows.len();
        let items = rows
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|(_, _, file)| file.clone())
            .collect();
        Ok(FilePage { items, total })
    }
}
