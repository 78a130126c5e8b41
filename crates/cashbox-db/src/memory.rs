use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use cashbox_types::api::Counts;

use crate::models::{CountRow, UserRow};
use crate::{Store, StoreError, StoreResult};

/// In-process store with the same semantics as the SQLite one. Nothing
/// survives the process; meant for tests and throwaway runs.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    counts: Vec<CountRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Backend(anyhow!("Memory store lock poisoned: {}", e)))
    }
}

impl Tables {
    fn insert_user(&mut self, username: &str, password_hash: &str) -> i64 {
        let id = self.users.last().map_or(1, |u| u.id + 1);
        self.users.push(UserRow {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        });
        id
    }

    fn has_user(&self, username: &str) -> bool {
        self.users.iter().any(|u| u.username == username)
    }
}

impl Store for MemoryStore {
    fn init_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<i64> {
        let mut tables = self.tables()?;
        if tables.has_user(username) {
            return Err(StoreError::UsernameTaken);
        }
        Ok(tables.insert_user(username, password_hash))
    }

    fn create_user_if_absent(&self, username: &str, password_hash: &str) -> StoreResult<bool> {
        let mut tables = self.tables()?;
        if tables.has_user(username) {
            return Ok(false);
        }
        tables.insert_user(username, password_hash);
        Ok(true)
    }

    fn get_user_by_username(&self, username: &str) -> StoreResult<Option<UserRow>> {
        let tables = self.tables()?;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    fn insert_counts(&self, username: &str, counts: &Counts, timestamp: &str) -> StoreResult<usize> {
        let mut tables = self.tables()?;
        let first_id = tables.counts.last().map_or(1, |c| c.id + 1);
        let rows = counts
            .iter()
            .zip(first_id..)
            .map(|((denomination, &count), id)| CountRow {
                id,
                username: username.to_string(),
                denomination: denomination.clone(),
                count,
                timestamp: timestamp.to_string(),
            });
        tables.counts.extend(rows);
        Ok(counts.len())
    }

    fn counts_for_user(&self, username: &str) -> StoreResult<Vec<CountRow>> {
        let tables = self.tables()?;
        Ok(tables
            .counts
            .iter()
            .filter(|c| c.username == username)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let store = MemoryStore::new();
        assert_eq!(store.create_user("a", "h").unwrap(), 1);
        assert_eq!(store.create_user("b", "h").unwrap(), 2);
        assert!(matches!(store.create_user("a", "h"), Err(StoreError::UsernameTaken)));
    }

    #[test]
    fn counts_are_filtered_by_username() {
        let store = MemoryStore::new();
        let mut counts = Counts::new();
        counts.insert("LKR20".into(), 5);
        counts.insert("LKR50".into(), 1);
        store.insert_counts("a", &counts, "t1").unwrap();
        store.insert_counts("b", &counts, "t2").unwrap();

        let rows = store.counts_for_user("b").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 3);
        assert!(rows.iter().all(|r| r.timestamp == "t2"));
    }
}
