use cashbox_types::api::Counts;

use crate::models::{CountRow, UserRow};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username already exists")]
    UsernameTaken,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.into())
    }
}

/// Everything the HTTP handlers need from persistence. Handlers receive an
/// `Arc<dyn Store>`, so tests can swap SQLite for [`crate::MemoryStore`].
pub trait Store: Send + Sync {
    /// Create the `users` and `counts` tables if they do not exist yet.
    fn init_schema(&self) -> StoreResult<()>;

    /// Insert a user and return its id. A duplicate username yields
    /// [`StoreError::UsernameTaken`].
    fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<i64>;

    /// Insert a user unless the username is already taken. Returns whether a
    /// row was added.
    fn create_user_if_absent(&self, username: &str, password_hash: &str) -> StoreResult<bool>;

    fn get_user_by_username(&self, username: &str) -> StoreResult<Option<UserRow>>;

    /// Persist one row per denomination, all stamped with `timestamp`.
    /// Either every row is stored or none is.
    fn insert_counts(&self, username: &str, counts: &Counts, timestamp: &str) -> StoreResult<usize>;

    /// Count rows for a username, oldest first.
    fn counts_for_user(&self, username: &str) -> StoreResult<Vec<CountRow>>;
}
