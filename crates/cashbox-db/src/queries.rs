use cashbox_types::api::Counts;
use rusqlite::{Connection, OptionalExtension, ffi, params};

use crate::models::{CountRow, UserRow};
use crate::{Database, Store, StoreError, StoreResult, schema};

impl Store for Database {
    fn init_schema(&self) -> StoreResult<()> {
        self.with_conn(|conn| schema::run(conn))
    }

    // -- Users --

    fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
                (username, password_hash),
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    StoreError::UsernameTaken
                }
                other => other.into(),
            })?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn create_user_if_absent(&self, username: &str, password_hash: &str) -> StoreResult<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO users (username, password_hash) VALUES (?1, ?2)",
                (username, password_hash),
            )?;
            Ok(inserted == 1)
        })
    }

    fn get_user_by_username(&self, username: &str) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Counts --

    fn insert_counts(&self, username: &str, counts: &Counts, timestamp: &str) -> StoreResult<usize> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO counts (username, denomination, count, timestamp) VALUES (?1, ?2, ?3, ?4)",
                )?;
                for (denomination, count) in counts {
                    stmt.execute(params![username, denomination, count, timestamp])?;
                }
            }
            tx.commit()?;
            Ok(counts.len())
        })
    }

    fn counts_for_user(&self, username: &str) -> StoreResult<Vec<CountRow>> {
        self.with_conn(|conn| query_counts(conn, username))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> StoreResult<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password_hash FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_counts(conn: &Connection, username: &str) -> StoreResult<Vec<CountRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, denomination, count, timestamp
         FROM counts
         WHERE username = ?1
         ORDER BY id",
    )?;

    let rows = stmt
        .query_map([username], |row| {
            Ok(CountRow {
                id: row.get(0)?,
                username: row.get(1)?,
                denomination: row.get(2)?,
                count: row.get(3)?,
                timestamp: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.init_schema().unwrap();
        db
    }

    fn counts(entries: &[(&str, i64)]) -> Counts {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = db();
        let id = db.create_user("nimal", "hash-a").unwrap();
        assert!(id > 0);

        let err = db.create_user("nimal", "hash-b").unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken));

        let user = db.get_user_by_username("nimal").unwrap().unwrap();
        assert_eq!(user.password_hash, "hash-a");
    }

    #[test]
    fn lookup_is_exact() {
        let db = db();
        db.create_user("Nimal", "hash").unwrap();
        assert!(db.get_user_by_username("nimal").unwrap().is_none());
        assert!(db.get_user_by_username("Nimal").unwrap().is_some());
    }

    #[test]
    fn insert_if_absent_only_once() {
        let db = db();
        assert!(db.create_user_if_absent("admin", "h1").unwrap());
        assert!(!db.create_user_if_absent("admin", "h2").unwrap());
        let admin = db.get_user_by_username("admin").unwrap().unwrap();
        assert_eq!(admin.password_hash, "h1");
    }

    #[test]
    fn schema_init_is_idempotent() {
        let db = db();
        db.create_user("kamal", "hash").unwrap();
        db.init_schema().unwrap();
        assert!(db.get_user_by_username("kamal").unwrap().is_some());
    }

    #[test]
    fn counts_share_timestamp() {
        let db = db();
        let stored = db
            .insert_counts("kamal", &counts(&[("LKR100", 2), ("LKR5000", 1)]), "2026-01-01T00:00:00.000Z")
            .unwrap();
        assert_eq!(stored, 2);

        let rows = db.counts_for_user("kamal").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.timestamp == "2026-01-01T00:00:00.000Z"));
        assert!(db.counts_for_user("nobody").unwrap().is_empty());
    }

    #[test]
    fn rows_follow_submission_order() {
        let db = db();
        db.insert_counts("kamal", &counts(&[("LKR5000", 1), ("LKR100", 2), ("LKR2", 3)]), "t")
            .unwrap();
        let labels: Vec<_> = db
            .counts_for_user("kamal")
            .unwrap()
            .into_iter()
            .map(|r| r.denomination)
            .collect();
        assert_eq!(labels, ["LKR5000", "LKR100", "LKR2"]);
    }

    #[test]
    fn counts_for_unknown_user_are_accepted() {
        let db = db();
        db.insert_counts("ghost", &counts(&[("XYZ", 4)]), "t").unwrap();
        let rows = db.counts_for_user("ghost").unwrap();
        assert_eq!(rows[0].denomination, "XYZ");
        assert_eq!(rows[0].count, 4);
    }

    #[test]
    fn failed_batch_stores_nothing() {
        let db = db();
        db.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER reject_lkr5 BEFORE INSERT ON counts
                 WHEN NEW.denomination = 'LKR5'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )?;
            Ok(())
        })
        .unwrap();

        let result = db.insert_counts("kamal", &counts(&[("LKR1", 1), ("LKR5", 1), ("LKR10", 1)]), "t");
        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert!(db.counts_for_user("kamal").unwrap().is_empty());
    }

    #[test]
    fn missing_schema_is_a_backend_error() {
        let db = Database::open_in_memory().unwrap();
        let err = db.create_user("kamal", "hash").unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
