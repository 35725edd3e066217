use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Schema steps, applied in order. The index of a step plus one is the
/// `user_version` the database reports once it has been applied.
const MIGRATIONS: &[&str] = &[
    // 1: users and news
    "
    CREATE TABLE IF NOT EXISTS users (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        username    TEXT NOT NULL UNIQUE,
        password    TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_users_username
        ON users(username);

    CREATE TABLE IF NOT EXISTS news (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT NOT NULL,
        content     TEXT NOT NULL,
        author      TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_news_author
        ON news(author);
    ",
];

pub fn run(conn: &mut Connection) -> Result<()> {
    let current = schema_version(conn)?;

    for (idx, sql) in MIGRATIONS.iter().enumerate().skip(current) {
        let version = idx + 1;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version as i64)?;
        tx.commit()?;
        info!("Applied migration {}", version);
    }

    info!("Database migrations complete (schema v{})", MIGRATIONS.len());
    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<usize> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version as usize)
}
