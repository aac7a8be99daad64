//! Bible chapter audio metadata endpoint.

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use tracing::instrument;

/// Raw query parameters, validated by hand so that missing and non-numeric
/// values share the same 400 taxonomy.
#[derive(Debug, Deserialize)]
pub struct BibleAudioQuery {
    pub book_id: Option<String>,
    pub chapter: Option<String>,
}

/// Response body for `GET /api/bible/audio-metadata`.
#[derive(Debug, Serialize)]
pub struct BibleAudioResponse {
    pub audio_url: String,
    pub duration: f64,
    pub verse_timings: serde_json::Value,
    pub created_at: String,
}

fn parse_required_i64(name: &str, value: Option<&str>) -> ApiResult<i64> {
    let value = value
        .ok_or_else(|| ApiError::BadRequest(format!("missing required parameter: {name}")))?;
    value
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("parameter {name} must be an integer: {value}")))
}

/// GET /api/bible/audio-metadata?book_id=&chapter=
///
/// Single-row lookup. A missing row or a row with no audio URL both answer
/// 404; the record itself is owned and mutated by the relational store.
#[instrument(skip(state))]
pub async fn bible_audio_metadata(
    State(state): State<AppState>,
    Query(query): Query<BibleAudioQuery>,
) -> ApiResult<Json<BibleAudioResponse>> {
    let book_id = parse_required_i64("book_id", query.book_id.as_deref())?;
    let chapter = parse_required_i64("chapter", query.chapter.as_deref())?;

    metrics::BIBLE_METADATA_QUERIES.inc();

    let row = state
        .metadata
        .get_bible_audio(book_id, chapter)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("no audio metadata for book {book_id} chapter {chapter}"))
        })?;

    if row.audio_url.is_empty() {
        return Err(ApiError::NotFound(format!(
            "no audio available for book {book_id} chapter {chapter}"
        )));
    }

    let created_at = row
        .created_at
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal(format!("failed to format timestamp: {e}")))?;

    Ok(Json(BibleAudioResponse {
        audio_url: row.audio_url,
        duration: row.duration,
        verse_timings: row.verse_timings.0,
        created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_missing_and_non_numeric() {
        assert!(parse_required_i64("book_id", None).is_err());
        assert!(parse_required_i64("book_id", Some("abc")).is_err());
        assert!(parse_required_i64("book_id", Some("1.5")).is_err());
        assert_eq!(parse_required_i64("book_id", Some("43")).unwrap(), 43);
    }
}
