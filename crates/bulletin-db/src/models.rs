//! Database row types — these map directly to SQLite rows.
//! Distinct from bulletin-types view models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string.
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
}

/// Outcome of a registration insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewUser {
    Created(i64),
    UsernameTaken,
}
