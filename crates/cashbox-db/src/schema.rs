use rusqlite::Connection;
use tracing::info;

use crate::StoreResult;

/// `counts.username` is free text; it is not a foreign key into `users`.
pub fn run(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            username        TEXT NOT NULL UNIQUE,
            password_hash   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counts (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            username        TEXT NOT NULL,
            denomination    TEXT NOT NULL,
            count           INTEGER NOT NULL,
            timestamp       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_counts_username
            ON counts(username, id);
        ",
    )?;

    info!("Database schema ready");
    Ok(())
}
