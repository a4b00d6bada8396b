use colored::*;
use dir_indexer_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Scan phase: spinner (unknown total files upfront)
/// - Store write phase: progress bar (row count known from the scan)
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn with_bar(&self, update: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                update(pb);
            }
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars(TICK_CHARS));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root: &Path) {
        self.set_bar(spinner(&format!("Scanning {}...", root.display())));
    }

    fn on_scan_progress(&self, files_found: usize, current_dir: &Path) {
        self.with_bar(|pb| {
            pb.set_message(format!(
                "Scanning... {} files found ({})",
                files_found,
                current_dir.display()
            ))
        });
    }

    fn on_scan_complete(
        &self,
        total_files: usize,
        skipped_dirs: u64,
        unreadable_files: u64,
        duration_secs: f64,
    ) {
        self.finish_bar();
        eprintln!(
            "  {} Scan complete: {} files in {:.2}s",
            "✓".green(),
            total_files,
            duration_secs
        );
        if skipped_dirs > 0 || unreadable_files > 0 {
            eprintln!(
                "  {} Skipped {} directories and {} files that could not be read",
                "!".yellow(),
                skipped_dirs,
                unreadable_files
            );
        }
    }

    fn on_db_write_start(&self, total_rows: usize) {
        let pb = ProgressBar::new(total_rows as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} Writing store [{bar:30.cyan/dim}] {pos}/{len} rows ({eta} remaining)",
        ) {
            pb.set_style(style.progress_chars("━╸─").tick_chars(TICK_CHARS));
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_db_write_progress(&self, rows_written: usize, total_rows: usize) {
        self.with_bar(|pb| {
            if pb.length() != Some(total_rows as u64) {
                pb.set_length(total_rows as u64);
            }
            pb.set_position(rows_written as u64);
        });
    }

    fn on_db_write_complete(&self, rows: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Store write complete: {} records in {:.2}s",
            "✓".green(),
            rows,
            duration_secs
        );
    }
}
