mod load;
pub mod models;
mod queries;
mod sqlite;

pub use load::write_store;
pub use models::{StoreMetadata, StoreSummary};
pub use sqlite::{Database, REQUIRED_INDEXES};

pub(crate) use queries::{file_from_row, FILE_COLUMNS};
