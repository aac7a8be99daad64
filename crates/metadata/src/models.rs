//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use sqlx::types::Json;
use time::OffsetDateTime;

/// Bible chapter audio record.
///
/// One row per (book_id, chapter). `verse_timings` carries the
/// client-defined timing payload verbatim as JSON.
#[derive(Debug, Clone, FromRow)]
pub struct BibleAudioRow {
    pub book_id: i64,
    pub chapter: i64,
    pub audio_url: String,
    pub duration: f64,
    pub verse_timings: Json<serde_json::Value>,
    pub created_at: OffsetDateTime,
}
