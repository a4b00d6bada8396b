use crate::model::FileRecord;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    Name,
    /// Total size for folders, byte size for files.
    Size,
    Extension,
    Modified,
    Created,
}

impl SortColumn {
    /// Expression ordering the `entries` relation of the relational backend
    /// exactly like [`SortKey`] orders in memory.
    pub(crate) fn sql_expr(self) -> &'static str {
        match self {
            SortColumn::Name => "lower(name)",
            SortColumn::Size => "size",
            SortColumn::Extension => "extension",
            SortColumn::Modified => "modified",
            SortColumn::Created => "created",
        }
    }

    /// Same ordering over the `files` table itself.
    pub(crate) fn file_sql_expr(self) -> &'static str {
        match self {
            SortColumn::Size => "size_bytes",
            other => other.sql_expr(),
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortColumn::Name),
            "size" | "size_bytes" => Ok(SortColumn::Size),
            "extension" | "ext" => Ok(SortColumn::Extension),
            "modified" => Ok(SortColumn::Modified),
            "created" => Ok(SortColumn::Created),
            other => Err(format!(
                "unknown sort column '{}' (expected name, size, extension, modified or created)",
                other
            )),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortColumn::Name => "name",
            SortColumn::Size => "size",
            SortColumn::Extension => "extension",
            SortColumn::Modified => "modified",
            SortColumn::Created => "created",
        };
        f.write_str(name)
    }
}

/// Folders order before files when kinds are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum EntryKind {
    Folder,
    File,
}

/// Comparable value of one entry for one column. `Missing` (a folder has no
/// extension or timestamps) orders before any present value, as SQL NULL
/// does in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum SortKey {
    Missing,
    Number(u64),
    Text(String),
    Time(DateTime<Utc>),
}

pub(crate) fn folder_key(column: SortColumn, name: &str, total_size: u64) -> SortKey {
    match column {
        SortColumn::Name => SortKey::Text(fold_case(name)),
        SortColumn::Size => SortKey::Number(total_size),
        SortColumn::Extension | SortColumn::Modified | SortColumn::Created => SortKey::Missing,
    }
}

pub(crate) fn file_key(column: SortColumn, file: &FileRecord) -> SortKey {
    match column {
        SortColumn::Name => SortKey::Text(fold_case(&file.name)),
        SortColumn::Size => SortKey::Number(file.size_bytes),
        SortColumn::Extension => SortKey::Text(file.extension.clone()),
        SortColumn::Modified => SortKey::Time(file.modified),
        SortColumn::Created => SortKey::Time(file.created),
    }
}

/// Stable sort of `(kind, key, item)` rows. With `folders_first` the kind
/// partitions the rows and the column orders each group; otherwise the
/// column decides and kind only breaks ties. Remaining ties keep input order.
pub(crate) fn order_entries<T>(
    rows: &mut [(EntryKind, SortKey, T)],
    ascending: bool,
    folders_first: bool,
) {
    rows.sort_by(|a, b| {
        let by_key = if ascending { a.1.cmp(&b.1) } else { b.1.cmp(&a.1) };
        if folders_first {
            a.0.cmp(&b.0).then(by_key)
        } else {
            by_key.then(a.0.cmp(&b.0))
        }
    });
}

/// ASCII-only case folding, matching SQLite's built-in `lower()`.
pub(crate) fn fold_case(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Case-insensitive substring test; `needle` must already be folded.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(needle)
}
