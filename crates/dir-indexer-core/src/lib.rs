pub mod access;
pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod mode;
pub mod model;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod storage;

pub use access::{DataAccess, FileQuery, ListOptions, SortColumn, TreeAccess};
pub use config::AppConfig;
pub use engine::{IndexEngine, IndexOutcome, IndexRequest};
pub use error::Error;
pub use mode::{select_mode, ModeDecision, ModeFlags, ReportMode};
pub use model::{FileRecord, ScanResult};
pub use progress::{ProgressReporter, SilentReporter};
