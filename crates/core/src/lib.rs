//! Core domain types and shared logic for the myAmen media backend.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Object key and file name validation
//! - Signed upload descriptors and API wire types
//! - Configuration sections for server, storage, metadata, upload, and proxy

pub mod config;
pub mod error;
pub mod key;
pub mod upload;

pub use error::{Error, Result};
pub use key::{is_card_background_name, validate_file_name};
pub use upload::{
    CheckFileRequest, CheckFileResponse, DirectUploadRequest, DirectUploadResponse,
    SignedUploadDescriptor, UploadUrlRequest, UploadUrlResponse,
};

/// Default signed upload URL lifetime: 1 hour.
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;

/// Default request body ceiling: 50 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Maximum accepted object key length in bytes.
pub const MAX_KEY_LENGTH: usize = 1024;

/// Cache lifetime for the generic image proxy: 1 hour.
pub const PROXY_CACHE_SECS: u64 = 3600;

/// Cache lifetime for card background images: 24 hours.
pub const CARD_BACKGROUND_CACHE_SECS: u64 = 86400;
