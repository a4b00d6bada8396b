use colored::*;
use dir_indexer_core::access::{Entry, EntryPage, FilePage, FolderSummary, SearchHit};
use dir_indexer_core::analysis::{ExtensionSummary, ReportStatistics};
use dir_indexer_core::format::{format_size, format_timestamp};
use dir_indexer_core::model::FileRecord;

const FOLDER_ICON: &str = "📁";

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", path)
    }
}

fn entry_line(entry: &Entry) -> String {
    match entry {
        Entry::Folder(folder) => format!(
            "{} {:<40} {:>12} {:>8} files",
            FOLDER_ICON,
            format!("{}/", folder.name).blue().bold(),
            format_size(folder.total_size),
            folder.file_count
        ),
        Entry::File(file) => format!(
            "{} {:<40} {:>12} {}",
            file.icon,
            file.name,
            format_size(file.size_bytes),
            format_timestamp(&file.modified).dimmed()
        ),
    }
}

pub fn print_folder(summary: &FolderSummary, page: &EntryPage, offset: usize) {
    println!(
        "{} {} ({}) - {} files, {}",
        FOLDER_ICON,
        summary.name.bold(),
        display_path(&summary.path),
        summary.file_count,
        format_size(summary.total_size).green()
    );
    for entry in &page.items {
        println!("  {}", entry_line(entry));
    }
    if page.items.is_empty() {
        println!("  {}", "(no entries)".dimmed());
    } else {
        println!(
            "{}",
            format!(
                "Showing {}-{} of {}",
                offset + 1,
                offset + page.items.len(),
                page.total
            )
            .dimmed()
        );
    }
}

pub fn print_files_page(page: &FilePage, offset: usize) {
    for file in &page.items {
        println!(
            "  {} {:<60} {:>12} {}",
            file.icon,
            file.relative_path,
            format_size(file.size_bytes),
            format_timestamp(&file.modified).dimmed()
        );
    }
    if page.items.is_empty() {
        println!("  {}", "(no files)".dimmed());
    } else {
        println!(
            "{}",
            format!(
                "Showing {}-{} of {} files",
                offset + 1,
                offset + page.items.len(),
                page.total
            )
            .dimmed()
        );
    }
}

/// Hits arrive ordered by containing folder; print one heading per folder.
pub fn print_hits(query: &str, hits: &[SearchHit]) {
    let mut current: Option<&str> = None;
    for hit in hits {
        if current != Some(hit.parent.as_str()) {
            println!("{}", display_path(&hit.parent).cyan().bold());
            current = Some(hit.parent.as_str());
        }
        println!("  {}", entry_line(&hit.entry));
    }
    println!(
        "{}",
        format!("{} matches for '{}'", hits.len(), query).dimmed()
    );
}

fn print_extensions(title: &str, rows: &[ExtensionSummary]) {
    println!("{}", title.bold());
    for row in rows {
        println!(
            "  {:<12} {:>8} files {:>12}",
            row.extension,
            row.count,
            format_size(row.total_size)
        );
    }
}

fn print_files(title: &str, files: &[FileRecord], show: impl Fn(&FileRecord) -> String) {
    println!("{}", title.bold());
    for file in files {
        println!("  {} {:<60} {:>20}", file.icon, file.relative_path, show(file));
    }
}

pub fn print_statistics(root: &str, total_files: u64, total_size: u64, stats: &ReportStatistics) {
    println!(
        "{} {} - {} files, {}",
        FOLDER_ICON,
        root.bold(),
        total_files,
        format_size(total_size).green()
    );
    print_extensions("Top extensions by count", &stats.top_extensions_by_count);
    print_extensions("Top extensions by size", &stats.top_extensions_by_size);
    print_files("Largest files", &stats.largest_files, |f| format_size(f.size_bytes));
    print_files("Recently modified", &stats.recently_modified, |f| {
        format_timestamp(&f.modified)
    });
    print_files("Recently created", &stats.recently_created, |f| {
        format_timestamp(&f.created)
    });
}
