mod commands;
mod display;
mod logging;
mod progress;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dir_indexer_core::access::{DataAccess, FileQuery, ListOptions, TreeAccess};
use dir_indexer_core::analysis::{build_tree, ReportStatistics};
use dir_indexer_core::format::format_size;
use dir_indexer_core::model::{root_display_name, ScanResult};
use dir_indexer_core::storage::Database;
use dir_indexer_core::{AppConfig, Error, IndexEngine, IndexRequest, ModeDecision, ModeFlags};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match dir_indexer_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };
    if let Err(err) = config.validate() {
        error!("{}", err);
        process::exit(1);
    }

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Index {
            root,
            output,
            db,
            embedded,
            yes,
        }) => run_index(
            &config,
            root,
            output,
            ModeFlags {
                force_relational: db,
                force_embedded: embedded,
            },
            yes,
        ),
        Some(Commands::Browse {
            source,
            path,
            sort,
            desc,
            mixed,
            filter,
            limit,
            offset,
        }) => {
            let options = ListOptions {
                sort,
                ascending: !desc,
                folders_first: !mixed,
                search: filter,
                limit: limit.unwrap_or(config.browse.page_size),
                offset,
            };
            run_browse(&config, &source, &path, &options)
        }
        Some(Commands::Files {
            source,
            sort,
            desc,
            filter,
            ext,
            limit,
            offset,
        }) => {
            let query = FileQuery {
                sort,
                ascending: !desc,
                search: filter,
                extension: ext,
                limit: limit.unwrap_or(config.browse.page_size),
                offset,
            };
            run_files(&config, &source, &query)
        }
        Some(Commands::Search { source, query }) => run_search(&config, &source, &query),
        Some(Commands::Stats { source }) => run_stats(&config, &source),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    match result {
        Ok(()) => {}
        Err(Error::NoFiles(root)) => info!("No files found in {}", root.display()),
        Err(err) => {
            error!("Error: {}", err);
            process::exit(1);
        }
    }

    Ok(())
}

fn run_index(
    config: &AppConfig,
    root: PathBuf,
    output: PathBuf,
    flags: ModeFlags,
    assume_yes: bool,
) -> Result<(), Error> {
    let engine = IndexEngine::new(config.clone());
    let reporter = CliReporter::new();
    let request = IndexRequest {
        root,
        output_stem: output,
        flags,
    };
    let confirm = |decision: &ModeDecision| {
        if assume_yes {
            return true;
        }
        let reason = decision
            .warnings
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        prompt_confirm(&format!("Warning: {}. Continue?", reason), Some(false)).unwrap_or(false)
    };

    let outcome = engine.run(&request, &reporter, &confirm)?;

    println!();
    info!(
        "Scan: {}, Write: {}",
        format!("{:.2}s", outcome.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", outcome.write_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files, {} in {} mode",
        format!("{}", outcome.total_files).cyan(),
        format_size(outcome.total_size).cyan(),
        format!("{}", outcome.decision.mode).bold(),
    );
    if outcome.skipped_dirs > 0 || outcome.unreadable_files > 0 {
        info!(
            "{} directories and {} files could not be read",
            format!("{}", outcome.skipped_dirs).yellow(),
            format!("{}", outcome.unreadable_files).yellow(),
        );
    }
    info!(
        "Wrote {} ({})",
        outcome.artifact.display(),
        format_size(outcome.artifact_size)
    );

    Ok(())
}

/// A browse source: a store written by `index`, or a directory scanned now.
enum Source {
    Store(Database),
    Scan(ScanResult),
}

fn open_source(config: &AppConfig, path: &Path) -> Result<Source, Error> {
    if path.is_dir() {
        let engine = IndexEngine::new(config.clone());
        Ok(Source::Scan(engine.scan(path, &CliReporter::new())?))
    } else if path.is_file() {
        Ok(Source::Store(Database::open(path)?))
    } else {
        Err(Error::RootNotFound(path.to_path_buf()))
    }
}

fn with_access<T>(
    source: &Source,
    f: impl FnOnce(&dyn DataAccess) -> Result<T, Error>,
) -> Result<T, Error> {
    match source {
        Source::Store(db) => f(db),
        Source::Scan(scan) => {
            let tree = build_tree(&scan.root_path, &scan.files);
            f(&TreeAccess::new(&tree, &scan.files))
        }
    }
}

fn run_browse(
    config: &AppConfig,
    source: &Path,
    path: &str,
    options: &ListOptions,
) -> Result<(), Error> {
    let source = open_source(config, source)?;
    let path = path.trim_matches('/');
    with_access(&source, |access| {
        let summary = access
            .get_folder(path)?
            .ok_or_else(|| Error::Other(format!("no folder '{}' in this index", path)))?;
        let page = access.list_entries(path, options)?;
        display::print_folder(&summary, &page, options.offset);
        Ok(())
    })
}

fn run_files(config: &AppConfig, source: &Path, query: &FileQuery) -> Result<(), Error> {
    let source = open_source(config, source)?;
    with_access(&source, |access| {
        let page = access.list_files(query)?;
        display::print_files_page(&page, query.offset);
        Ok(())
    })
}

fn run_search(config: &AppConfig, source: &Path, query: &str) -> Result<(), Error> {
    let source = open_source(config, source)?;
    with_access(&source, |access| {
        let hits = access.search_global(query)?;
        display::print_hits(query, &hits);
        Ok(())
    })
}

fn run_stats(config: &AppConfig, source: &Path) -> Result<(), Error> {
    match open_source(config, source)? {
        Source::Store(db) => {
            let meta = db.store_metadata()?;
            let stats = db.report_statistics(&config.statistics)?;
            display::print_statistics(
                &root_display_name(&meta.root_path),
                meta.total_files,
                meta.total_size,
                &stats,
            );
        }
        Source::Scan(scan) => {
            let stats = ReportStatistics::from_scan(&scan, &config.statistics);
            display::print_statistics(
                &scan.root_name(),
                scan.file_count() as u64,
                scan.total_size,
                &stats,
            );
        }
    }
    Ok(())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(default.unwrap_or(false));
        }

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}

