//! Multipart form parsing helpers
//!
//! Provides reusable abstractions for parsing multipart/form-data uploads,
//! keeping field extraction and validation out of the handlers.

use std::collections::HashMap;

use axum::extract::Multipart;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::validation::{validate_content_type, validate_file_size};

/// Represents a media file uploaded via multipart form
#[derive(Debug, Clone)]
pub struct MediaField {
    /// File data bytes
    pub data: Vec<u8>,
    /// Content-Type from the multipart field (if provided)
    pub content_type: Option<String>,
    /// Original filename from the multipart field (if provided)
    pub file_name: Option<String>,
}

/// Parsed multipart form fields
///
/// Provides structured access to the media file and text fields of a
/// multipart/form-data request, including JSON-encoded text fields such as
/// the report `location`.
#[derive(Debug)]
pub struct MultipartFields {
    /// Media file field (named "media")
    media: Option<MediaField>,
    /// Text fields indexed by name
    text_fields: HashMap<String, String>,
}

impl MultipartFields {
    /// Parse all fields from a multipart request
    ///
    /// The file field must be named `media`; its Content-Type and size are
    /// validated during parsing. All other fields are collected as text.
    pub async fn parse(
        multipart: &mut Multipart,
        max_file_size: usize,
    ) -> Result<Self, ApiError> {
        let mut media: Option<MediaField> = None;
        let mut text_fields = HashMap::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to parse multipart: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == "media" {
                let content_type = field.content_type().map(|s| s.to_string());
                let file_name = field.file_name().map(|s| s.to_string());

                validate_content_type(content_type.as_deref())?;

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read media: {}", e)))?
                    .to_vec();

                validate_file_size(data.len(), max_file_size)?;

                media = Some(MediaField {
                    data,
                    content_type,
                    file_name,
                });
            } else {
                // Text field
                let value = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read field '{}': {}", name, e))
                })?;
                text_fields.insert(name, value);
            }
        }

        Ok(Self { media, text_fields })
    }

    /// Get the media file field (required)
    ///
    /// Returns a validation error if no media file was uploaded.
    pub fn require_media(&self) -> Result<&MediaField, ApiError> {
        self.media.as_ref().ok_or_else(|| {
            ApiError::bad_request("No content. Use the 'media' field in the multipart form.")
        })
    }

    /// Get a text field value
    ///
    /// Returns `None` if the field is not present.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.text_fields.get(name).map(|s| s.as_str())
    }

    /// Get a text field parsed as JSON
    ///
    /// Returns:
    /// - `Ok(Some(T))` if the field exists and is valid JSON
    /// - `Ok(None)` if the field is missing or empty
    /// - `Err(ApiError)` if the field exists but JSON parsing fails
    pub fn get_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ApiError> {
        match self.text_fields.get(name) {
            Some(json) if !json.is_empty() => {
                let value: T = serde_json::from_str(json)
                    .map_err(|e| ApiError::bad_request(format!("Invalid {} JSON: {}", name, e)))?;
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noisewatch_core::Location;

    #[test]
    fn test_get_text() {
        let mut text_fields = HashMap::new();
        text_fields.insert("reason".to_string(), "Loud Music".to_string());

        let fields = MultipartFields {
            media: None,
            text_fields,
        };

        assert_eq!(fields.get_text("reason"), Some("Loud Music"));
        assert_eq!(fields.get_text("missing"), None);
    }

    #[test]
    fn test_require_media_missing() {
        let fields = MultipartFields {
            media: None,
            text_fields: HashMap::new(),
        };

        assert!(fields.require_media().is_err());
    }

    #[test]
    fn test_get_json_location() {
        let mut text_fields = HashMap::new();
        text_fields.insert(
            "location".to_string(),
            r#"{"latitude":14.5995,"longitude":120.9842}"#.to_string(),
        );

        let fields = MultipartFields {
            media: None,
            text_fields,
        };

        let location: Option<Location> = fields.get_json("location").unwrap();
        let location = location.unwrap();
        assert_eq!(location.latitude, Some(14.5995));
        assert_eq!(location.longitude, Some(120.9842));
    }

    #[test]
    fn test_get_json_missing_or_empty() {
        let mut text_fields = HashMap::new();
        text_fields.insert("location".to_string(), String::new());

        let fields = MultipartFields {
            media: None,
            text_fields,
        };

        let missing: Option<Location> = fields.get_json("nothing").unwrap();
        assert!(missing.is_none());
        let empty: Option<Location> = fields.get_json("location").unwrap();
        assert!(empty.is_none());
    }

    #[test]
    fn test_get_json_invalid() {
        let mut text_fields = HashMap::new();
        text_fields.insert("location".to_string(), "{not json".to_string());

        let fields = MultipartFields {
            media: None,
            text_fields,
        };

        let result: Result<Option<Location>, _> = fields.get_json("location");
        assert!(result.is_err());
    }
}
