use std::path::PathBuf;
use std::time::Duration;

/// Contents of the `metadata` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreMetadata {
    pub total_files: u64,
    pub total_size: u64,
    pub root_path: String,
    pub generated_date: String,
}

/// Result of writing a store file.
#[derive(Debug, Clone)]
pub struct StoreSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub size_bytes: u64,
    pub duration: Duration,
}
