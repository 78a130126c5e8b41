/// Database row types — these map directly to SQLite rows.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRow {
    pub id: i64,
    pub username: String,
    pub denomination: String,
    pub count: i64,
    pub timestamp: String,
}
