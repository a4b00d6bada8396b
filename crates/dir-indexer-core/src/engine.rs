use crate::analysis::{build_tree, ReportStatistics};
use crate::config::AppConfig;
use crate::error::Error;
use crate::mode::{select_mode, ModeDecision, ModeFlags, ReportMode};
use crate::model::ScanResult;
use crate::progress::ProgressReporter;
use crate::report::EmbeddedReport;
use crate::scanner;
use crate::storage::write_store;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct IndexEngine {
    config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct IndexRequest {
    pub root: PathBuf,
    /// Output path without extension; `.json` or `.db` is appended.
    pub output_stem: PathBuf,
    pub flags: ModeFlags,
}

#[derive(Debug)]
pub struct IndexOutcome {
    pub decision: ModeDecision,
    pub total_files: usize,
    pub total_size: u64,
    pub skipped_dirs: u64,
    pub unreadable_files: u64,
    pub scan_duration: Duration,
    pub write_duration: Duration,
    pub artifact: PathBuf,
    pub artifact_size: u64,
}

impl IndexEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scan(&self, root: &Path, reporter: &dyn ProgressReporter) -> Result<ScanResult, Error> {
        scanner::scan_directory(root, &self.config.scan, reporter)
    }

    /// Run the full indexing pipeline:
    /// 1. Scan the root directory
    /// 2. Choose embedded or relational mode
    /// 3. Write the JSON report or the SQLite store
    ///
    /// A scan without files ends with [`Error::NoFiles`] and no artifact.
    /// `confirm` is consulted only when the decision requires it; declining
    /// aborts before anything is written.
    pub fn run(
        &self,
        request: &IndexRequest,
        reporter: &dyn ProgressReporter,
        confirm: &dyn Fn(&ModeDecision) -> bool,
    ) -> Result<IndexOutcome, Error> {
        self.config.validate()?;

        // Phase 1: Scan
        info!("Scanning {}...", request.root.display());
        let scan = self.scan(&request.root, reporter)?;
        if scan.files.is_empty() {
            warn!("No files found in {}; nothing to write", scan.root_path.display());
            return Err(Error::NoFiles(scan.root_path));
        }

        // Phase 2: Mode
        let decision = select_mode(scan.file_count(), request.flags, &self.config.mode);
        for warning in &decision.warnings {
            warn!("{}", warning);
        }
        if decision.requires_confirmation() && !confirm(&decision) {
            return Err(Error::Aborted(format!(
                "embedding {} files was not confirmed",
                scan.file_count()
            )));
        }
        info!("Report mode: {}", decision.mode);

        // Phase 3: Write
        let write_start = Instant::now();
        let (artifact, artifact_size) = match decision.mode {
            ReportMode::Embedded => {
                let path = request.output_stem.with_extension("json");
                let statistics = ReportStatistics::from_scan(&scan, &self.config.statistics);
                let tree = build_tree(&scan.root_path, &scan.files);
                debug!("Tree built: {} folders at top level", tree.children().len());
                let size = EmbeddedReport::new(&scan, &statistics, &tree).write_json(&path)?;
                (path, size)
            }
            ReportMode::Relational => {
                let path = request.output_stem.with_extension("db");
                let summary = write_store(&path, &scan, &self.config.storage, reporter)?;
                (summary.path, summary.size_bytes)
            }
        };

        Ok(IndexOutcome {
            decision,
            total_files: scan.file_count(),
            total_size: scan.total_size,
            skipped_dirs: scan.skipped_dirs,
            unreadable_files: scan.unreadable_files,
            scan_duration: scan.duration,
            write_duration: write_start.elapsed(),
            artifact,
            artifact_size,
        })
    }
}
