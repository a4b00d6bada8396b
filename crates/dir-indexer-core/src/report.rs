use crate::analysis::{ReportStatistics, TreeNode};
use crate::error::Error;
use crate::format::{format_size, format_timestamp};
use crate::model::{ExtensionStats, FileRecord, ScanResult};
use chrono::Utc;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Self-contained report: every record and the full folder tree, serialized
/// for a viewer that needs no store.
#[derive(Debug, Serialize)]
pub struct EmbeddedReport<'a> {
    pub root_path: String,
    pub root_name: String,
    pub generated_at: String,
    pub total_files: usize,
    pub total_size: u64,
    pub total_size_human: String,
    pub extension_stats: &'a ExtensionStats,
    pub statistics: &'a ReportStatistics,
    pub files: &'a [FileRecord],
    pub tree: &'a TreeNode<'a>,
}

impl<'a> EmbeddedReport<'a> {
    pub fn new(scan: &'a ScanResult, statistics: &'a ReportStatistics, tree: &'a TreeNode<'a>) -> Self {
        Self {
            root_path: scan.root_path.to_string_lossy().into_owned(),
            root_name: tree.name.clone(),
            generated_at: format_timestamp(&Utc::now()),
            total_files: scan.files.len(),
            total_size: scan.total_size,
            total_size_human: format_size(scan.total_size),
            extension_stats: &scan.extension_stats,
            statistics,
            files: &scan.files,
            tree,
        }
    }

    /// Write the report as JSON, returning the number of bytes written.
    pub fn write_json(&self, path: &Path) -> Result<u64, Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        drop(writer);

        let size = std::fs::metadata(path)?.len();
        info!("Embedded report written: {} ({})", path.display(), format_size(size));
        Ok(size)
    }
}
