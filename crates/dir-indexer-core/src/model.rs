use crate::format;
use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Extension recorded for files without one.
pub const NO_EXTENSION: &str = "(none)";

/// One scanned file. Immutable once the scan produced it.
///
/// `created` is the true creation time where the platform exposes it and the
/// inode-change time otherwise, so it is not comparable across platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub name: String,
    /// Path from the scan root, `/`-separated.
    pub relative_path: String,
    /// `relative_path` without the file name; empty for files in the root.
    pub directory: String,
    pub size_bytes: u64,
    /// Lowercased, dot-prefixed, or [`NO_EXTENSION`].
    pub extension: String,
    pub modified: DateTime<Utc>,
    /// Birth time where the platform reports one, otherwise the unix ctime
    /// (inode change), otherwise `modified`. Not comparable across platforms.
    pub created: DateTime<Utc>,
    pub icon: &'static str,
}

impl FileRecord {
    /// Build a record from its relative path; every other textual field is
    /// derived from it. Timestamps are truncated to whole seconds.
    pub fn new(
        relative_path: impl Into<String>,
        size_bytes: u64,
        modified: DateTime<Utc>,
        created: DateTime<Utc>,
    ) -> Self {
        let relative_path = relative_path.into();
        let (directory, name) = match relative_path.rsplit_once('/') {
            Some((dir, name)) => (dir.to_string(), name.to_string()),
            None => (String::new(), relative_path.clone()),
        };
        let extension = extension_of(&name);
        let icon = format::icon_for(&extension);
        Self {
            name,
            relative_path,
            directory,
            size_bytes,
            extension,
            modified: whole_seconds(modified),
            created: whole_seconds(created),
            icon,
        }
    }

    pub fn size_human(&self) -> String {
        format::format_size(self.size_bytes)
    }
}

/// Lowercased extension with its leading dot, or [`NO_EXTENSION`].
///
/// Follows `Path::extension`: `.bashrc` and `notes.` have no extension.
pub fn extension_of(name: &str) -> String {
    match Path::new(name).extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => NO_EXTENSION.to_string(),
    }
}

pub fn whole_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_nanosecond(0).unwrap_or(ts)
}

pub fn system_time_to_utc(time: SystemTime) -> DateTime<Utc> {
    whole_seconds(DateTime::<Utc>::from(time))
}

/// Display name of a scan root: its last component, or the whole path for
/// roots such as `/`.
pub fn root_display_name(root: &str) -> String {
    Path::new(root)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionStat {
    pub count: u64,
    pub total_size: u64,
}

/// Per-extension file count and byte total, kept ordered by extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtensionStats(BTreeMap<String, ExtensionStat>);

impl ExtensionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, extension: &str, size: u64) {
        let stat = self.0.entry(extension.to_string()).or_default();
        stat.count += 1;
        stat.total_size += size;
    }

    pub fn insert(&mut self, extension: String, stat: ExtensionStat) {
        self.0.insert(extension, stat);
    }

    pub fn get(&self, extension: &str) -> Option<&ExtensionStat> {
        self.0.get(extension)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ExtensionStat)> {
        self.0.iter()
    }
}

/// Output of one directory scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub root_path: PathBuf,
    /// Traversal order; not sorted.
    pub files: Vec<FileRecord>,
    pub total_size: u64,
    pub extension_stats: ExtensionStats,
    /// Directories that could not be opened; their subtrees are absent.
    pub skipped_dirs: u64,
    /// Entries whose type or metadata could not be read.
    pub unreadable_files: u64,
    pub duration: Duration,
}

impl ScanResult {
    /// Assemble a result from already-collected records, recomputing the
    /// aggregates.
    pub fn from_records(root_path: impl Into<PathBuf>, files: Vec<FileRecord>) -> Self {
        let mut extension_stats = ExtensionStats::new();
        let mut total_size = 0;
        for file in &files {
            total_size += file.size_bytes;
            extension_stats.record(&file.extension, file.size_bytes);
        }
        Self {
            root_path: root_path.into(),
            files,
            total_size,
            extension_stats,
            skipped_dirs: 0,
            unreadable_files: 0,
            duration: Duration::ZERO,
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn root_name(&self) -> String {
        root_display_name(&self.root_path.to_string_lossy())
    }
}
