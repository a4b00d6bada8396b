use clap::{Parser, Subcommand};
use dir_indexer_core::SortColumn;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dir-indexer")]
#[command(about = "Index a directory tree and browse it", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory and write an embedded JSON report or a SQLite store
    Index {
        /// Directory to scan
        root: PathBuf,
        /// Output path without extension (.json or .db is appended)
        #[arg(short, long, default_value = "dir-index")]
        output: PathBuf,
        /// Always write the SQLite store
        #[arg(long)]
        db: bool,
        /// Embed every record even above the relational threshold
        #[arg(long)]
        embedded: bool,
        /// Do not ask before embedding an oversized dataset
        #[arg(short, long)]
        yes: bool,
    },
    /// List the subfolders and files of one folder
    Browse {
        /// SQLite store (.db) or a directory to scan in memory
        source: PathBuf,
        /// Folder path relative to the root; empty for the root
        #[arg(default_value = "")]
        path: String,
        /// name, size, extension, modified or created
        #[arg(long, default_value = "name")]
        sort: SortColumn,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Sort folders and files together instead of folders first
        #[arg(long)]
        mixed: bool,
        /// Case-insensitive substring filter on name or extension
        #[arg(long, default_value = "")]
        filter: String,
        /// Page size; defaults to browse.page_size
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// List every file of the index as one flat table
    Files {
        /// SQLite store (.db) or a directory to scan in memory
        source: PathBuf,
        /// name, size, extension, modified or created
        #[arg(long, default_value = "name")]
        sort: SortColumn,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Case-insensitive substring filter on file name or directory
        #[arg(long, default_value = "")]
        filter: String,
        /// Only files with this extension, e.g. .txt or (none)
        #[arg(long)]
        ext: Option<String>,
        /// Page size; defaults to browse.page_size
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Search every folder and file name
    Search {
        /// SQLite store (.db) or a directory to scan in memory
        source: PathBuf,
        query: String,
    },
    /// Show totals, top extensions and notable files
    Stats {
        /// SQLite store (.db) or a directory to scan in memory
        source: PathBuf,
    },
    /// Print configuration values
    PrintConfig,
}
