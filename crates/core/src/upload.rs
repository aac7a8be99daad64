//! Wire types for the upload and existence-check endpoints.
//!
//! All JSON field names follow the client's camelCase convention.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/audio/check` and `POST /api/audio/upload`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFileRequest {
    /// Object key to probe.
    pub file_name: String,
}

/// Response body for a successful existence check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFileResponse {
    pub success: bool,
    pub public_url: String,
}

/// Request body for `POST /api/audio/upload`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// Object key the signed URL will be scoped to.
    pub file_name: String,
}

/// A time-boxed signed PUT URL plus the deterministic public URL for the key.
///
/// Ephemeral: generated per request, never persisted. The caller must PUT to
/// `upload_url` before `expires_in` seconds elapse; `public_url` becomes valid
/// only once that PUT succeeds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUploadDescriptor {
    pub upload_url: String,
    pub public_url: String,
    pub expires_in: u64,
}

/// Response body for `POST /api/audio/upload`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub success: bool,
    pub upload_url: String,
    pub public_url: String,
    pub expires_in: u64,
}

impl UploadUrlResponse {
    pub fn from_descriptor(descriptor: SignedUploadDescriptor) -> Self {
        Self {
            success: true,
            upload_url: descriptor.upload_url,
            public_url: descriptor.public_url,
            expires_in: descriptor.expires_in,
        }
    }
}

/// Request body for `POST /api/file/upload`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectUploadRequest {
    pub file_name: String,
    /// Standard-alphabet base64 payload.
    pub file_base64: String,
    /// Defaults to `application/octet-stream` when omitted.
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Response body for `POST /api/file/upload`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectUploadResponse {
    pub success: bool,
    pub public_url: String,
}
