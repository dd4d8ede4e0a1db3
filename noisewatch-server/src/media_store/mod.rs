//! Media store module
//!
//! External object storage for uploaded audio/video evidence. The report
//! store only ever sees the resulting URL; the bytes live with this
//! collaborator.
//!
//! - **HTTP** (production): Cloudinary-style unsigned upload endpoint,
//!   selected when `MEDIA_UPLOAD_URL` is set.
//! - **In-memory** (development fallback and tests).
//!
//! The contract is a single upload attempt per submission: callers do not
//! retry, and a failure is surfaced immediately.

mod http;
mod memory;

pub use http::HttpMediaStore;
pub use memory::MemoryMediaStore;

use std::sync::Arc;

use async_trait::async_trait;

use noisewatch_core::MediaType;

/// Media storage errors
#[derive(Debug, thiserror::Error)]
pub enum MediaStoreError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Unexpected upload response: {0}")]
    InvalidResponse(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A media file queued for upload.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    /// Raw file bytes
    pub data: Vec<u8>,
    /// Content-Type as sent by the client (if any)
    pub content_type: Option<String>,
    /// Original filename as sent by the client (if any)
    pub file_name: Option<String>,
    /// Declared media kind
    pub media_type: MediaType,
}

/// Reference to an uploaded media file.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// Publicly reachable URL of the stored file
    pub url: String,
}

/// External media storage collaborator.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload one media file. Exactly one attempt; no retry on failure.
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia, MediaStoreError>;
}

/// Create the media store from environment
///
/// Uses the HTTP store if `MEDIA_UPLOAD_URL` is set (with the optional
/// `MEDIA_UPLOAD_PRESET`), otherwise falls back to in-memory storage.
pub fn from_env() -> Arc<dyn MediaStore> {
    match std::env::var("MEDIA_UPLOAD_URL") {
        Ok(url) if !url.is_empty() => {
            let preset = std::env::var("MEDIA_UPLOAD_PRESET").unwrap_or_default();
            tracing::info!("Using HTTP media storage");
            Arc::new(HttpMediaStore::new(url, preset))
        }
        _ => {
            tracing::warn!("MEDIA_UPLOAD_URL not set, using in-memory media storage");
            Arc::new(MemoryMediaStore::new())
        }
    }
}
