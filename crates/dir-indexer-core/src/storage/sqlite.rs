use rusqlite::{Connection, OpenFlags, Result};
use std::path::Path;
use tracing::debug;

/// Index names the browse queries rely on.
pub const REQUIRED_INDEXES: [&str; 9] = [
    "idx_extension",
    "idx_size",
    "idx_modified",
    "idx_created",
    "idx_name",
    "idx_directory",
    "idx_directory_name",
    "idx_name_lower",
    "idx_directory_lower",
];

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open an existing store for browsing. The store is never written after
    /// creation, so the connection is read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!("Opened store {} read-only", path.display());
        Ok(Database { conn })
    }

    /// Create a brand-new store at `path` with tables but no indexes; the
    /// caller loads rows and then calls [`Database::create_indexes`].
    pub(crate) fn create(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.configure_load_pragmas()?;
        db.create_tables()?;
        Ok(db)
    }

    /// Fully indexed, empty store in memory.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.configure_load_pragmas()?;
        db.create_tables()?;
        db.create_indexes()?;
        Ok(db)
    }

    fn configure_load_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = MEMORY;
             PRAGMA synchronous = OFF;
             PRAGMA temp_store = MEMORY;
             PRAGMA cache_size = -64000;",
        )?;
        debug!("SQLite load pragmas configured (memory journal, 64MB cache)");
        Ok(())
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        debug!("SQLite tables created");
        Ok(())
    }

    pub(crate) fn create_indexes(&self) -> Result<()> {
        self.conn.execute_batch(include_str!("indexes.sql"))?;
        debug!("SQLite indexes created");
        Ok(())
    }

    /// True once every index in [`REQUIRED_INDEXES`] exists.
    pub fn has_required_indexes(&self) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'files'")?;
        let present: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>>>()?;
        Ok(REQUIRED_INDEXES
            .iter()
            .all(|name| present.iter().any(|p| p == name)))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error from flushing the file.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| err)
    }
}
