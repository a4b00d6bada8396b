use super::models::StoreSummary;
use super::sqlite::Database;
use crate::config::StorageConfig;
use crate::error::Error;
use crate::format::{format_timestamp, TIMESTAMP_FORMAT};
use crate::model::ScanResult;
use crate::progress::ProgressReporter;
use rusqlite::params;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Write `scan` to a fresh store at `path`.
///
/// Any store already at `path` is deleted first. The new store is built next
/// to it under a staging name and only renamed into place once rows and
/// indexes are committed, so a failed run never leaves a file at `path` that
/// looks complete.
pub fn write_store(
    path: &Path,
    scan: &ScanResult,
    config: &StorageConfig,
    reporter: &dyn ProgressReporter,
) -> Result<StoreSummary, Error> {
    let start = Instant::now();
    let staging = staging_path(path);

    remove_if_exists(path)?;
    remove_if_exists(&staging)?;

    info!("Creating SQLite store: {}", path.display());
    reporter.on_db_write_start(scan.files.len());

    if let Err(err) = build_store(&staging, scan, config, reporter) {
        if let Err(cleanup) = remove_if_exists(&staging) {
            warn!("Could not remove staging store {}: {}", staging.display(), cleanup);
        }
        return Err(err);
    }
    fs::rename(&staging, path)?;

    let size_bytes = fs::metadata(path)?.len();
    let duration = start.elapsed();
    info!(
        "Store written: {} rows, {} bytes in {:.2}s",
        scan.files.len(),
        size_bytes,
        duration.as_secs_f64()
    );
    reporter.on_db_write_complete(scan.files.len(), duration.as_secs_f64());

    Ok(StoreSummary {
        path: path.to_path_buf(),
        rows: scan.files.len(),
        size_bytes,
        duration,
    })
}

fn build_store(
    staging: &Path,
    scan: &ScanResult,
    config: &StorageConfig,
    reporter: &dyn ProgressReporter,
) -> Result<(), Error> {
    let db = Database::create(staging)?;
    db.load_scan(scan, config.batch_size, reporter)?;
    db.create_indexes()?;
    if !db.has_required_indexes()? {
        return Err(Error::Other("store is missing required indexes".to_string()));
    }
    db.close()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed existing file {}", path.display());
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

impl Database {
    /// Insert metadata, extension stats and every file row in one transaction.
    /// Files keep scan order, so `id` order equals scan order.
    pub fn load_scan(
        &self,
        scan: &ScanResult,
        batch_size: usize,
        reporter: &dyn ProgressReporter,
    ) -> Result<usize, Error> {
        let tx = self.connection().unchecked_transaction()?;
        let root = scan.root_path.to_string_lossy().into_owned();
        let generated = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();
        {
            let mut meta_stmt =
                tx.prepare_cached("INSERT INTO metadata (key, value) VALUES (?1, ?2)")?;
            meta_stmt.execute(params!["total_files", scan.files.len().to_string()])?;
            meta_stmt.execute(params!["total_size", scan.total_size.to_string()])?;
            meta_stmt.execute(params!["root_path", root])?;
            meta_stmt.execute(params!["generated_date", generated])?;

            let mut ext_stmt = tx.prepare_cached(
                "INSERT INTO extension_stats (extension, count, total_size) VALUES (?1, ?2, ?3)",
            )?;
            for (extension, stat) in scan.extension_stats.iter() {
                ext_stmt.execute(params![extension, stat.count as i64, stat.total_size as i64])?;
            }

            let mut file_stmt = tx.prepare_cached(
                "INSERT INTO files \
                 (name, path, relative_path, directory, size_bytes, size_human, \
                  extension, modified, created, icon) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            let total = scan.files.len();
            let mut written = 0;
            for batch in scan.files.chunks(batch_size.max(1)) {
                for file in batch {
                    let absolute = scan.root_path.join(&file.relative_path);
                    file_stmt.execute(params![
                        file.name,
                        absolute.to_string_lossy(),
                        file.relative_path,
                        file.directory,
                        file.size_bytes as i64,
                        file.size_human(),
                        file.extension,
                        format_timestamp(&file.modified),
                        format_timestamp(&file.created),
                        file.icon,
                    ])?;
                }
                written += batch.len();
                debug!("Inserted {} / {} files", written, total);
                reporter.on_db_write_progress(written, total);
            }
        }
        tx.commit()?;
        Ok(scan.files.len())
    }
}
