use std::path::Path;

/// Trait for reporting scan and store-write progress.
///
/// The CLI implements it with indicatif bars. All methods have default no-op
/// implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self, _root: &Path) {}
    fn on_scan_progress(&self, _files_found: usize, _current_dir: &Path) {}
    fn on_scan_complete(
        &self,
        _total_files: usize,
        _skipped_dirs: u64,
        _unreadable_files: u64,
        _duration_secs: f64,
    ) {
    }
    fn on_db_write_start(&self, _total_rows: usize) {}
    fn on_db_write_progress(&self, _rows_written: usize, _total_rows: usize) {}
    fn on_db_write_complete(&self, _rows: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
