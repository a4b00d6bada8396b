use crate::config::ScanConfig;
use crate::error::Error;
use crate::model::{system_time_to_utc, ExtensionStats, FileRecord, ScanResult};
use crate::progress::ProgressReporter;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Component, Path};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Walk `root` once and collect a [`FileRecord`] for every readable regular file.
///
/// Symlinks are never followed. A directory that cannot be opened is skipped
/// with its whole subtree; an entry whose metadata cannot be read is skipped.
/// Names that are not valid UTF-8 are skipped the same way. All of these are
/// only counted, never logged one by one.
pub fn scan_directory(
    root: &Path,
    config: &ScanConfig,
    reporter: &dyn ProgressReporter,
) -> Result<ScanResult, Error> {
    let metadata = match fs::metadata(root) {
        Ok(m) => m,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::RootNotFound(root.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };
    if !metadata.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }
    let root = fs::canonicalize(root)?;

    info!("Scanning {}", root.display());
    reporter.on_scan_start(&root);
    let start = Instant::now();

    let mut walker = Walker {
        root: &root,
        progress_interval: config.progress_interval.max(1),
        reporter,
        files: Vec::new(),
        total_size: 0,
        extension_stats: ExtensionStats::new(),
        skipped_dirs: 0,
        unreadable_files: 0,
    };
    walker.visit_dir(&root);

    let duration = start.elapsed();
    info!(
        "Scan complete: {} files, {} bytes in {:.2}s",
        walker.files.len(),
        walker.total_size,
        duration.as_secs_f64()
    );
    if walker.skipped_dirs > 0 || walker.unreadable_files > 0 {
        warn!(
            "{} directories and {} files skipped due to access errors",
            walker.skipped_dirs, walker.unreadable_files
        );
    }
    reporter.on_scan_complete(
        walker.files.len(),
        walker.skipped_dirs,
        walker.unreadable_files,
        duration.as_secs_f64(),
    );

    Ok(ScanResult {
        files: walker.files,
        total_size: walker.total_size,
        extension_stats: walker.extension_stats,
        skipped_dirs: walker.skipped_dirs,
        unreadable_files: walker.unreadable_files,
        duration,
        root_path: root,
    })
}

struct Walker<'a> {
    root: &'a Path,
    progress_interval: usize,
    reporter: &'a dyn ProgressReporter,
    files: Vec<FileRecord>,
    total_size: u64,
    extension_stats: ExtensionStats,
    skipped_dirs: u64,
    unreadable_files: u64,
}

impl Walker<'_> {
    fn visit_dir(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => {
                self.skipped_dirs += 1;
                return;
            }
        };

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(_) => {
                    self.unreadable_files += 1;
                    continue;
                }
            };
            // DirEntry::file_type does not traverse symlinks.
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(_) => {
                    self.unreadable_files += 1;
                    continue;
                }
            };

            // Records are keyed by their UTF-8 relative path; a name that is
            // not valid UTF-8 cannot be stored without colliding with another.
            let utf8_name = entry.file_name().to_str().is_some();

            if file_type.is_symlink() {
                continue;
            } else if !utf8_name {
                if file_type.is_dir() {
                    self.skipped_dirs += 1;
                } else if file_type.is_file() {
                    self.unreadable_files += 1;
                }
            } else if file_type.is_dir() {
                self.visit_dir(&entry.path());
            } else if file_type.is_file() {
                match entry.metadata() {
                    Ok(metadata) => self.add_file(&entry.path(), &metadata),
                    Err(_) => self.unreadable_files += 1,
                }
            }
        }
    }

    fn add_file(&mut self, path: &Path, metadata: &Metadata) {
        let Some(relative_path) = relative_path(self.root, path) else {
            self.unreadable_files += 1;
            return;
        };
        let size = metadata.len();
        let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
        let record = FileRecord::new(
            relative_path,
            size,
            system_time_to_utc(modified),
            system_time_to_utc(created_time(metadata, modified)),
        );

        self.total_size += size;
        self.extension_stats.record(&record.extension, size);
        self.files.push(record);

        if self.files.len() % self.progress_interval == 0 {
            debug!("Processed {} files...", self.files.len());
            let current_dir = path.parent().unwrap_or(self.root);
            self.reporter.on_scan_progress(self.files.len(), current_dir);
        }
    }
}

/// `/`-joined path of `path` below `root`, independent of the platform
/// separator. `None` outside `root` or when a segment is not valid UTF-8.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str().map(str::to_string)),
            _ => None,
        })
        .collect::<Option<_>>()?;
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Birth time where the platform records one, otherwise the inode-change time
/// on Unix and the modification time elsewhere.
fn created_time(metadata: &Metadata, modified: SystemTime) -> SystemTime {
    if let Ok(created) = metadata.created() {
        return created;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let secs = metadata.ctime();
        if secs >= 0 {
            return UNIX_EPOCH + std::time::Duration::from_secs(secs as u64);
        }
    }
    modified
}
