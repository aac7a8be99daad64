//! Repository traits for metadata operations.

pub mod bible_audio;

pub use bible_audio::BibleAudioRepo;
