//! In-memory media store (development fallback and tests).

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use noisewatch_core::MediaType;

use super::{MediaStore, MediaStoreError, MediaUpload, StoredMedia};

/// Non-persistent media storage backed by a concurrent map.
///
/// Uploaded bytes are addressable by their generated `memory://` URL so
/// tests can assert what was stored.
#[derive(Debug, Default)]
pub struct MemoryMediaStore {
    objects: DashMap<String, Vec<u8>>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.objects.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn extension(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Audio => "m4a",
        MediaType::Video => "mp4",
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia, MediaStoreError> {
        let url = format!(
            "memory://media/{}.{}",
            Uuid::new_v4(),
            extension(upload.media_type)
        );

        self.objects.insert(url.clone(), upload.data);

        Ok(StoredMedia { url })
    }
}
