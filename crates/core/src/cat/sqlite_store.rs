//! SQLite-backed cat store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::{Cat, CatError, CatStore, Vote};

/// SQLite-backed cat store.
pub struct SqliteCatStore {
    conn: Mutex<Connection>,
}

impl SqliteCatStore {
    /// Create a new SQLite store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatError> {
        let conn = Connection::open(path).map_err(db_error)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, CatError> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatError> {
        conn.execute_batch(
            r#"
            -- seq keeps insertion order for listing
            CREATE TABLE IF NOT EXISTS cats (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                url TEXT NOT NULL,
                source_url TEXT,
                name TEXT NOT NULL,
                loves INTEGER NOT NULL DEFAULT 0 CHECK (loves >= 0),
                hates INTEGER NOT NULL DEFAULT 0 CHECK (hates >= 0)
            );
            "#,
        )
        .map_err(db_error)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatError> {
        self.conn
            .lock()
            .map_err(|_| CatError::Storage("database lock poisoned".to_string()))
    }

    fn row_to_cat(row: &rusqlite::Row) -> rusqlite::Result<Cat> {
        Ok(Cat {
            id: row.get(0)?,
            url: row.get(1)?,
            source_url: row.get(2)?,
            name: row.get(3)?,
            loves: row.get(4)?,
            hates: row.get(5)?,
        })
    }

    fn get_with(conn: &Connection, id: &str) -> Result<Option<Cat>, CatError> {
        conn.query_row(
            "SELECT id, url, source_url, name, loves, hates FROM cats WHERE id = ?",
            params![id],
            Self::row_to_cat,
        )
        .optional()
        .map_err(db_error)
    }

    fn insert_with(conn: &Connection, cat: &Cat) -> Result<(), CatError> {
        conn.execute(
            "INSERT INTO cats (id, url, source_url, name, loves, hates) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                &cat.id,
                &cat.url,
                &cat.source_url,
                &cat.name,
                cat.loves,
                cat.hates,
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(ref err, _)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                CatError::DuplicateKey(cat.id.clone())
            }
            _ => db_error(e),
        })?;
        Ok(())
    }
}

fn db_error(e: rusqlite::Error) -> CatError {
    CatError::Storage(format!("Database error: {}", e))
}

impl CatStore for SqliteCatStore {
    fn get(&self, id: &str) -> Result<Option<Cat>, CatError> {
        let conn = self.lock()?;
        Self::get_with(&conn, id)
    }

    fn list(&self) -> Result<Vec<Cat>, CatError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, url, source_url, name, loves, hates FROM cats ORDER BY seq")
            .map_err(db_error)?;

        let rows = stmt.query_map([], Self::row_to_cat).map_err(db_error)?;

        let mut cats = Vec::new();
        for row in rows {
            cats.push(row.map_err(db_error)?);
        }
        Ok(cats)
    }

    fn insert(&self, cat: &Cat) -> Result<(), CatError> {
        let conn = self.lock()?;
        Self::insert_with(&conn, cat)
    }

    fn insert_many(&self, cats: &[Cat]) -> Result<usize, CatError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_error)?;

        for cat in cats {
            // Dropping the transaction on error rolls it back.
            Self::insert_with(&tx, cat)?;
        }

        tx.commit().map_err(db_error)?;
        Ok(cats.len())
    }

    fn count(&self) -> Result<usize, CatError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM cats", [], |row| row.get(0))
            .map_err(db_error)?;
        Ok(count as usize)
    }

    fn increment(&self, id: &str, vote: Vote) -> Result<Option<Cat>, CatError> {
        let conn = self.lock()?;

        let sql = match vote {
            Vote::Love => "UPDATE cats SET loves = loves + 1 WHERE id = ?",
            Vote::Hate => "UPDATE cats SET hates = hates + 1 WHERE id = ?",
        };
        let rows_affected = conn.execute(sql, params![id]).map_err(db_error)?;

        if rows_affected == 0 {
            return Ok(None);
        }
        Self::get_with(&conn, id)
    }

    fn save(&self) -> Result<(), CatError> {
        // Every statement runs in autocommit mode, so there is nothing to flush.
        Ok(())
    }
}
