use crate::Database;
use crate::models::{NewUser, NewsRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};

impl Database {
    // -- Users --

    /// Insert a user. A username collision, whether seen by the lookup or
    /// raised by the UNIQUE constraint, reports `UsernameTaken`.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<NewUser> {
        self.with_conn_mut(|conn| {
            if query_user_by_username(conn, username)?.is_some() {
                return Ok(NewUser::UsernameTaken);
            }

            match conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                (username, password_hash),
            ) {
                Ok(_) => Ok(NewUser::Created(conn.last_insert_rowid())),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Ok(NewUser::UsernameTaken)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn count_users(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
        })
    }

    // -- News --

    pub fn insert_news(&self, title: &str, content: &str, author: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO news (title, content, author) VALUES (?1, ?2, ?3)",
                (title, content, author),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Every article, newest first.
    pub fn list_news(&self) -> Result<Vec<NewsRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, title, content, author FROM news ORDER BY id DESC")?;
            let rows = stmt
                .query_map([], news_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Articles posted under `author`, newest first.
    pub fn list_news_by_author(&self, author: &str) -> Result<Vec<NewsRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, content, author FROM news
                 WHERE author = ?1
                 ORDER BY id DESC",
            )?;
            let rows = stmt
                .query_map([author], news_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_news(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))?)
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare("SELECT id, username, password FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn news_from_row(row: &Row<'_>) -> rusqlite::Result<NewsRow> {
    Ok(NewsRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author: row.get(3)?,
    })
}
