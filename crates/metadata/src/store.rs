//! Metadata store trait and SQLite implementation.

use crate::error::MetadataResult;
use crate::repos::BibleAudioRepo;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: BibleAudioRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite schema (embedded).
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS bible_audio (
    book_id INTEGER NOT NULL,
    chapter INTEGER NOT NULL,
    audio_url TEXT NOT NULL,
    duration REAL NOT NULL,
    verse_timings TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (book_id, chapter)
);
"#;

/// SQLite-based metadata store.
///
/// Recommended for tests and single-node deployments. Use PostgreSQL
/// in production.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store and run migrations.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection avoids
            // persistent "database is locked" failures under test/axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

mod sqlite_impl {
    use super::*;
    use crate::models::BibleAudioRow;

    #[async_trait]
    impl BibleAudioRepo for SqliteStore {
        async fn get_bible_audio(
            &self,
            book_id: i64,
            chapter: i64,
        ) -> MetadataResult<Option<BibleAudioRow>> {
            let row = sqlx::query_as::<_, BibleAudioRow>(
                "SELECT * FROM bible_audio WHERE book_id = ? AND chapter = ?",
            )
            .bind(book_id)
            .bind(chapter)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn upsert_bible_audio(&self, row: &BibleAudioRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO bible_audio (book_id, chapter, audio_url, duration, verse_timings, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(book_id, chapter) DO UPDATE SET
                    audio_url = excluded.audio_url,
                    duration = excluded.duration,
                    verse_timings = excluded.verse_timings,
                    created_at = excluded.created_at
                "#,
            )
            .bind(row.book_id)
            .bind(row.chapter)
            .bind(&row.audio_url)
            .bind(row.duration)
            .bind(&row.verse_timings)
            .bind(row.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }
    }
}
