//! PostgreSQL-based metadata store implementation.

use crate::error::MetadataResult;
use crate::models::BibleAudioRow;
use crate::repos::BibleAudioRepo;
use crate::store::MetadataStore;
use amen_core::config::PgSslMode;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres};
use std::str::FromStr;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

fn postgres_schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                return None;
            }
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}

/// PostgreSQL-based metadata store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(url: &str, max_connections: u32) -> MetadataResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections).await
    }

    /// Create a new PostgreSQL store from individual connection parameters.
    ///
    /// This allows credentials to be passed separately, enabling better
    /// secret management (e.g., passwords via environment variables).
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        ssl_mode: Option<PgSslMode>,
        max_connections: u32,
    ) -> MetadataResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }

        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        if let Some(mode) = ssl_mode {
            let sqlx_mode = match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            };
            opts = opts.ssl_mode(sqlx_mode);
        }

        // Log connection info without password
        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            ssl_mode = ?ssl_mode,
            "Connecting to PostgreSQL"
        );

        Self::connect(opts, max_connections).await
    }

    async fn connect(opts: PgConnectOptions, max_connections: u32) -> MetadataResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for PostgresStore {
    async fn migrate(&self) -> MetadataResult<()> {
        for statement in postgres_schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl BibleAudioRepo for PostgresStore {
    async fn get_bible_audio(
        &self,
        book_id: i64,
        chapter: i64,
    ) -> MetadataResult<Option<BibleAudioRow>> {
        let row = sqlx::query_as::<_, BibleAudioRow>(
            "SELECT * FROM bible_audio WHERE book_id = $1 AND chapter = $2",
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
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (book_id, chapter) DO UPDATE SET
                audio_url = EXCLUDED.audio_url,
                duration = EXCLUDED.duration,
                verse_timings = EXCLUDED.verse_timings,
                created_at = EXCLUDED.created_at
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_splits_into_single_statements() {
        let statements = postgres_schema_statements(POSTGRES_SCHEMA);
        assert_eq!(statements.len(), 1);
        assert!(statements[0].contains("CREATE TABLE IF NOT EXISTS bible_audio"));
    }

    #[test]
    fn schema_splitter_skips_comment_only_fragments() {
        let statements = postgres_schema_statements("-- comment only;\n;SELECT 1;");
        assert_eq!(statements, vec!["SELECT 1"]);
    }
}
