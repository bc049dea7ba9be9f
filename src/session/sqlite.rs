use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

use super::{SessionError, SessionKey, SessionStore};

/// Session store persisted in a small SQLite file.
#[derive(Clone)]
pub struct SqliteSessionStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Open (or create) the session database at `path` and run migrations.
    ///
    /// `":memory:"` gives a throwaway store for tests.
    pub async fn open(path: &str) -> Result<Self, SessionError> {
        let url = format!("sqlite:{}?mode=rwc", path);

        // The file holds the user's identity: create it owner-only
        #[cfg(unix)]
        if path != ":memory:" {
            use std::os::unix::fs::OpenOptionsExt;
            let db_path = std::path::Path::new(path);
            if !db_path.exists() {
                let _file = std::fs::OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .mode(0o600)
                    .open(db_path)
                    .ok(); // If creation fails, SQLite will report the error at connect_with.
            }
        }

        let options = SqliteConnectOptions::from_str(&url)?.pragma("busy_timeout", "5000");
        // One connection: every `:memory:` connection would otherwise see its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl SessionStore for SqliteSessionStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>, SessionError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM session WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: SessionKey, value: &str) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            INSERT INTO session (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: SessionKey) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM session WHERE key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
