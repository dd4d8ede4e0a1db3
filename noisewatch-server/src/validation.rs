//! Upload validation module
//!
//! Provides validation utilities for multipart media uploads.

use noisewatch_core::MediaType;

use crate::error::ApiError;

/// Allowed MIME type categories for media uploads
const ALLOWED_MIME_PREFIXES: &[&str] = &["audio/", "video/", "application/octet-stream"];

/// Validates the Content-Type of an uploaded media file
///
/// Accepts:
/// - audio/* (audio/mpeg, audio/mp4, audio/wav, etc.)
/// - video/* (video/mp4, video/webm, etc.)
/// - application/octet-stream (binary data)
///
/// Returns an error if the Content-Type is not supported.
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), ApiError> {
    match content_type {
        Some(ct) => {
            let ct_lower = ct.to_lowercase();
            if ALLOWED_MIME_PREFIXES
                .iter()
                .any(|prefix| ct_lower.starts_with(prefix))
            {
                Ok(())
            } else {
                Err(ApiError::bad_request(format!(
                    "Unsupported Content-Type: '{}'. Allowed types: audio/*, video/*, application/octet-stream",
                    ct
                )))
            }
        }
        // Allow missing Content-Type (treat as binary)
        None => Ok(()),
    }
}

/// Validates the size of an uploaded file
///
/// Returns an error if the file exceeds the maximum size.
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), ApiError> {
    if size > max_size {
        let max_mb = max_size / (1024 * 1024);
        let actual_mb = size / (1024 * 1024);
        Err(ApiError::bad_request(format!(
            "File too large: {} MB exceeds maximum of {} MB",
            actual_mb, max_mb
        )))
    } else {
        Ok(())
    }
}

/// Validates that the declared media type agrees with the file Content-Type
///
/// A file sent as `video/*` cannot be declared `audio` and vice versa.
/// `application/octet-stream` and a missing Content-Type are accepted for
/// either declaration since they carry no type information.
pub fn validate_media_agreement(
    content_type: Option<&str>,
    declared: MediaType,
) -> Result<(), ApiError> {
    let Some(ct) = content_type else {
        return Ok(());
    };
    let ct_lower = ct.to_lowercase();

    let conflicting = match declared {
        MediaType::Audio => ct_lower.starts_with("video/"),
        MediaType::Video => ct_lower.starts_with("audio/"),
    };

    if conflicting {
        Err(ApiError::bad_request(format!(
            "Media file Content-Type '{}' does not match declared mediaType '{}'",
            ct, declared
        )))
    } else {
        Ok(())
    }
}
