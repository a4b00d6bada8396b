use crate::config::StatisticsConfig;
use crate::model::{ExtensionStats, FileRecord, ScanResult};
use serde::Serialize;
use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionSummary {
    pub extension: String,
    pub count: u64,
    pub total_size: u64,
}

/// Summary panels of a report: top extensions and notable files.
///
/// Extension lists are ordered by the metric descending, then by extension;
/// file lists by the metric descending, then by scan order. The relational
/// store computes the same lists with `ORDER BY ..., id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportStatistics {
    pub top_extensions_by_count: Vec<ExtensionSummary>,
    pub top_extensions_by_size: Vec<ExtensionSummary>,
    pub largest_files: Vec<FileRecord>,
    pub recently_modified: Vec<FileRecord>,
    pub recently_created: Vec<FileRecord>,
}

impl ReportStatistics {
    pub fn from_scan(scan: &ScanResult, config: &StatisticsConfig) -> Self {
        Self {
            top_extensions_by_count: top_extensions(&scan.extension_stats, config.top_extensions, |s| {
                s.count
            }),
            top_extensions_by_size: top_extensions(&scan.extension_stats, config.top_extensions, |s| {
                s.total_size
            }),
            largest_files: top_files(&scan.files, config.largest_files, |f| Reverse(f.size_bytes)),
            recently_modified: top_files(&scan.files, config.recent_files, |f| Reverse(f.modified)),
            recently_created: top_files(&scan.files, config.recent_files, |f| Reverse(f.created)),
        }
    }
}

fn top_extensions(
    stats: &ExtensionStats,
    limit: usize,
    metric: impl Fn(&ExtensionSummary) -> u64,
) -> Vec<ExtensionSummary> {
    // BTreeMap iteration is already ordered by extension, so a stable sort
    // on the metric alone leaves ties in extension order.
    let mut all: Vec<ExtensionSummary> = stats
        .iter()
        .map(|(ext, stat)| ExtensionSummary {
            extension: ext.clone(),
            count: stat.count,
            total_size: stat.total_size,
        })
        .collect();
    all.sort_by_key(|s| Reverse(metric(s)));
    all.truncate(limit);
    all
}

fn top_files<K: Ord>(files: &[FileRecord], limit: usize, key: impl Fn(&FileRecord) -> K) -> Vec<FileRecord> {
    let mut refs: Vec<&FileRecord> = files.iter().collect();
    refs.sort_by_key(|f| key(f));
    refs.into_iter().take(limit).cloned().collect()
}
