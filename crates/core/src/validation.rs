//! Local pre-flight validation of upload candidates.
//!
//! Checks run against file metadata only, before any network call.
//! They short-circuit in order: extension first, then size.

/// File extensions the backend will accept, lowercase, without the dot.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Upload size ceiling enforced client-side (25 MiB, matching the
/// backend's `MAX_CONTENT_LENGTH`).
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// A reason an upload candidate was rejected before submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The file extension is missing or not in [`ALLOWED_EXTENSIONS`].
    #[error("Unsupported file extension: {extension:?} (allowed: jpg, jpeg, png, webp)")]
    UnsupportedExtension {
        /// The offending extension, lowercased, if the name had one.
        extension: Option<String>,
    },

    /// The file exceeds [`MAX_UPLOAD_BYTES`].
    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },
}

/// Validate an upload candidate from its name and size.
///
/// Checks are evaluated in order and stop at the first failure; a file
/// that is both misnamed and oversized reports the extension problem.
pub fn validate_upload(file_name: &str, size_bytes: u64) -> Result<(), ValidationError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ref ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        other => return Err(ValidationError::UnsupportedExtension { extension: other }),
    }

    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge {
            size: size_bytes,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}
