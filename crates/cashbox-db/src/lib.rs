pub mod memory;
pub mod models;
pub mod queries;
pub mod schema;
pub mod store;

use anyhow::anyhow;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub use memory::MemoryStore;
pub use store::{Store, StoreError, StoreResult};

/// SQLite-backed store. One connection behind a mutex; every statement is
/// short, so writers never wait long.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file. Tables are created by
    /// [`Store::init_schema`], not here.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
        f(&mut conn)
    }
}
