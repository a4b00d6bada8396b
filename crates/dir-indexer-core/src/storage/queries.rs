use super::models::StoreMetadata;
use super::sqlite::Database;
use crate::analysis::{ExtensionSummary, ReportStatistics};
use crate::config::StatisticsConfig;
use crate::error::Error;
use crate::format::{icon_for, TIMESTAMP_FORMAT};
use crate::model::{ExtensionStat, ExtensionStats, FileRecord};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Result, Row};

/// Column list matching [`file_from_row`] when read from offset 0.
pub(crate) const FILE_COLUMNS: &str =
    "name, relative_path, directory, size_bytes, extension, modified, created";

/// Rebuild a [`FileRecord`] from seven consecutive columns starting at `at`,
/// in [`FILE_COLUMNS`] order.
pub(crate) fn file_from_row(row: &Row<'_>, at: usize) -> Result<FileRecord> {
    let extension: String = row.get(at + 4)?;
    let icon = icon_for(&extension);
    Ok(FileRecord {
        name: row.get(at)?,
        relative_path: row.get(at + 1)?,
        directory: row.get(at + 2)?,
        size_bytes: row.get::<_, i64>(at + 3)? as u64,
        extension,
        modified: timestamp_at(row, at + 5)?,
        created: timestamp_at(row, at + 6)?,
        icon,
    })
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl Database {
    // ── Metadata ─────────────────────────────────────────────────

    pub fn metadata_value(&self, key: &str) -> Result<Option<String>> {
        self.connection()
            .query_row(
                "SELECT value FROM metadata WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    pub fn store_metadata(&self) -> Result<StoreMetadata, Error> {
        let required = |key: &str| -> Result<String, Error> {
            self.metadata_value(key)?
                .ok_or_else(|| Error::Other(format!("metadata key '{}' missing from store", key)))
        };
        let parse = |key: &str, value: String| -> Result<u64, Error> {
            value
                .parse::<u64>()
                .map_err(|e| Error::Other(format!("metadata key '{}' is not a number: {}", key, e)))
        };
        Ok(StoreMetadata {
            total_files: parse("total_files", required("total_files")?)?,
            total_size: parse("total_size", required("total_size")?)?,
            root_path: required("root_path")?,
            generated_date: required("generated_date")?,
        })
    }

    pub fn file_count(&self) -> Result<i64> {
        self.connection()
            .query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))
    }

    // ── Extension statistics ─────────────────────────────────────

    pub fn extension_stats(&self) -> Result<ExtensionStats> {
        let mut stmt = self
            .connection()
            .prepare("SELECT extension, count, total_size FROM extension_stats")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    ExtensionStat {
                        count: row.get::<_, i64>(1)? as u64,
                        total_size: row.get::<_, i64>(2)? as u64,
                    },
                ))
            })?
            .collect::<Result<Vec<_>>>()?;

        let mut stats = ExtensionStats::new();
        for (extension, stat) in rows {
            stats.insert(extension, stat);
        }
        Ok(stats)
    }

    fn top_extensions(&self, order_column: &str, limit: usize) -> Result<Vec<ExtensionSummary>> {
        let sql = format!(
            "SELECT extension, count, total_size FROM extension_stats \
             ORDER BY {} DESC, extension LIMIT ?1",
            order_column
        );
        let mut stmt = self.connection().prepare(&sql)?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(ExtensionSummary {
                    extension: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                    total_size: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(rows)
    }

    // ── Notable files ────────────────────────────────────────────

    fn top_files(&self, order_column: &str, limit: usize) -> Result<Vec<FileRecord>> {
        let sql = format!(
            "SELECT {} FROM files ORDER BY {} DESC, id LIMIT ?1",
            FILE_COLUMNS, order_column
        );
        let mut stmt = self.connection().prepare(&sql)?;
        let rows = stmt
            .query_map(params![limit as i64], |row| file_from_row(row, 0))?
            .collect::<Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn largest_files(&self, limit: usize) -> Result<Vec<FileRecord>> {
        self.top_files("size_bytes", limit)
    }

    pub fn recently_modified(&self, limit: usize) -> Result<Vec<FileRecord>> {
        self.top_files("modified", limit)
    }

    pub fn recently_created(&self, limit: usize) -> Result<Vec<FileRecord>> {
        self.top_files("created", limit)
    }

    pub fn report_statistics(&self, config: &StatisticsConfig) -> Result<ReportStatistics> {
        Ok(ReportStatistics {
            top_extensions_by_count: self.top_extensions("count", config.top_extensions)?,
            top_extensions_by_size: self.top_extensions("total_size", config.top_extensions)?,
            largest_files: self.largest_files(config.largest_files)?,
            recently_modified: self.recently_modified(config.recent_files)?,
            recently_created: self.recently_created(config.recent_files)?,
        })
    }
}
