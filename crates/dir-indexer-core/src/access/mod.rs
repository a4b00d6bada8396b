//! Folder browsing over either backend.
//!
//! [`TreeAccess`] walks the in-memory [`TreeNode`](crate::analysis::TreeNode)
//! hierarchy; [`Database`](crate::storage::Database) answers the same calls
//! with indexed queries over the flat `files` table. Besides folder browsing
//! both offer the flat file table of the report through
//! [`DataAccess::list_files`]. Both must agree exactly
//! for the same scan: `tests/access_conformance.rs` runs one suite against
//! both.

mod memory;
mod relational;
pub mod sort;

pub use memory::TreeAccess;
pub use sort::SortColumn;

use crate::error::Error;
use crate::model::FileRecord;
use serde::Serialize;

/// Upper bound on the hits returned by [`DataAccess::search_global`].
pub const SEARCH_RESULT_LIMIT: usize = 1000;

/// Aggregates of one folder plus the names of its direct subfolders, in order
/// of first encounter during the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderSummary {
    pub name: String,
    pub path: String,
    pub file_count: u64,
    pub total_size: u64,
    pub children: Vec<String>,
}

/// A subfolder as it appears in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    pub name: String,
    pub path: String,
    pub file_count: u64,
    pub total_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Folder(FolderEntry),
    File(FileRecord),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Folder(folder) => &folder.name,
            Entry::File(file) => &file.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Entry::Folder(_))
    }

    /// Folder total size or file byte size.
    pub fn size(&self) -> u64 {
        match self {
            Entry::Folder(folder) => folder.total_size,
            Entry::File(file) => file.size_bytes,
        }
    }
}

/// One page of a listing. `total` counts every entry that passed the filter,
/// before `offset`/`limit` were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryPage {
    pub items: Vec<Entry>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Path of the containing folder; empty for the root.
    pub parent: String,
    pub entry: Entry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub sort: SortColumn,
    pub ascending: bool,
    pub folders_first: bool,
    /// Case-insensitive substring; empty disables filtering.
    pub search: String,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: SortColumn::Name,
            ascending: true,
            folders_first: true,
            search: String::new(),
            limit: 100,
            offset: 0,
        }
    }
}

/// Query over the flat table of every file in the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    pub sort: SortColumn,
    pub ascending: bool,
    /// Case-insensitive substring of the file name or its directory; empty
    /// disables filtering.
    pub search: String,
    /// Exact extension as recorded (`.txt`, or the no-extension sentinel),
    /// compared after ASCII lowercasing.
    pub extension: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for FileQuery {
    fn default() -> Self {
        Self {
            sort: SortColumn::Name,
            ascending: true,
            search: String::new(),
            extension: None,
            limit: 100,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilePage {
    pub items: Vec<FileRecord>,
    /// Matching files before pagination.
    pub total: usize,
}

/// Read-only browsing contract shared by both backends.
///
/// Paths are relative and `/`-separated; the empty string is the root. A
/// path that names no folder is not an error: `get_folder` returns `None`
/// and `list_entries` an empty page.
pub trait DataAccess {
    /// Display name of the scanned root.
    fn root_name(&self) -> Result<String, Error>;

    fn get_folder(&self, path: &str) -> Result<Option<FolderSummary>, Error>;

    /// Direct subfolders and files of `path`, filtered, sorted and paginated.
    /// Files match the filter on name or extension, folders on name.
    fn list_entries(&self, path: &str, options: &ListOptions) -> Result<EntryPage, Error>;

    /// Every folder and file in the tree whose name contains `query`
    /// (case-insensitive), ordered by containing path, folders before files,
    /// then name. At most [`SEARCH_RESULT_LIMIT`] hits; an empty query has
    /// none.
    fn search_global(&self, query: &str) -> Result<Vec<SearchHit>, Error>;

    /// Every file below the root regardless of folder, filtered by
    /// `query.search` and `query.extension`, sorted by one column with ties
    /// in scan order, and paginated.
    fn list_files(&self, query: &FileQuery) -> Result<FilePage, Error>;
}

/// `parent/name`, or `name` under the root.
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Containing folder of a relative folder path.
pub(crate) fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}
