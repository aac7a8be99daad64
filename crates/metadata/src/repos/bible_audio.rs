//! Bible chapter audio repository trait.

use crate::error::MetadataResult;
use crate::models::BibleAudioRow;
use async_trait::async_trait;

/// Repository for bible chapter audio metadata.
#[async_trait]
pub trait BibleAudioRepo: Send + Sync {
    /// Fetch the audio record for a chapter, if one exists.
    async fn get_bible_audio(
        &self,
        book_id: i64,
        chapter: i64,
    ) -> MetadataResult<Option<BibleAudioRow>>;

    /// Insert or replace the audio record for a chapter.
    async fn upsert_bible_audio(&self, row: &BibleAudioRow) -> MetadataResult<()>;
}
