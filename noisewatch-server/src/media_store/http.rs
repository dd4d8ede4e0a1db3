//! HTTP object-storage client (Cloudinary-style unsigned uploads).

use async_trait::async_trait;
use serde::Deserialize;

use noisewatch_core::MediaType;

use super::{MediaStore, MediaStoreError, MediaUpload, StoredMedia};

/// Upload endpoint response body. Only the URL fields are read.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

/// Media store posting unsigned multipart uploads to an HTTP endpoint.
pub struct HttpMediaStore {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl HttpMediaStore {
    pub fn new(upload_url: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: upload_url.into(),
            upload_preset: upload_preset.into(),
        }
    }

    /// Upload endpoint. Audio evidence rides the `video` resource type; the
    /// storage service handles both under the same pipeline.
    fn endpoint(&self) -> String {
        format!("{}/video/upload", self.upload_url.trim_end_matches('/'))
    }
}

/// Default filename per media kind, used when the client sent none.
fn default_file_name(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Audio => "evidence.m4a",
        MediaType::Video => "evidence.mp4",
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, upload: MediaUpload) -> Result<StoredMedia, MediaStoreError> {
        let file_name = upload
            .file_name
            .unwrap_or_else(|| default_file_name(upload.media_type).to_string());

        let size = upload.data.len();
        let mut part = reqwest::multipart::Part::bytes(upload.data).file_name(file_name);
        if let Some(ref content_type) = upload.content_type {
            part = part.mime_str(content_type)?;
        }

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let endpoint = self.endpoint();
        tracing::debug!(endpoint = %endpoint, size_bytes = size, "Uploading media file");

        let response = self.client.post(&endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaStoreError::Upload(format!(
                "upload endpoint returned {status}: {body}"
            )));
        }

        let body: UploadResponse = response.json().await?;
        let url = body.secure_url.or(body.url).ok_or_else(|| {
            MediaStoreError::InvalidResponse("response contains no secure_url or url".to_string())
        })?;

        tracing::info!(url = %url, size_bytes = size, "Media file uploaded");

        Ok(StoredMedia { url })
    }
}
