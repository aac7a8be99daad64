//! Object key and file name validation.
//!
//! Keys arrive as caller input and become object-store paths, so the rules
//! here are the first line of defense against path traversal and junk keys.

use crate::error::{Error, Result};
use crate::MAX_KEY_LENGTH;

/// Validate a caller-supplied file name used as an object-store key.
///
/// Accepts nested keys like `audio/gen/1.mp3` but rejects anything that could
/// escape the bucket prefix or confuse the store: empty names, absolute paths,
/// `..` components, backslashes, control characters, and oversized keys.
pub fn validate_file_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidFileName("fileName must not be empty".into()));
    }

    if name.len() > MAX_KEY_LENGTH {
        return Err(Error::InvalidFileName(format!(
            "fileName exceeds {} bytes",
            MAX_KEY_LENGTH
        )));
    }

    if name.starts_with('/') || name.contains('\\') {
        return Err(Error::InvalidFileName(format!(
            "fileName must be a relative path: {name}"
        )));
    }

    if name.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(Error::InvalidFileName(format!(
            "fileName contains an unsafe path component: {name}"
        )));
    }

    if name.chars().any(|c| c.is_control()) {
        return Err(Error::InvalidFileName(
            "fileName contains control characters".into(),
        ));
    }

    Ok(())
}

/// Check whether a name matches the card background pattern `bg<digits>.jpg`.
pub fn is_card_background_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("bg") else {
        return false;
    };
    let Some(digits) = rest.strip_suffix(".jpg") else {
        return false;
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
