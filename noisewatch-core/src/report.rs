//! Noise report domain model.
//!
//! A [`NoiseReport`] is the persisted record of one complaint submission:
//! an externally stored media file referenced by URL, a short reason, an
//! optional comment, and an optional capture location. Records are
//! write-once; nothing in the API mutates a report after creation.
//!
//! All construction funnels through [`NoiseReport::create`], which validates
//! the input and derives the GeoJSON point from the location coordinates.
//! Store backends persist the result verbatim, so no backend can produce a
//! record that skips validation or breaks the coordinate-order invariant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::geo::GeoPoint;

/// Longest accepted free-text comment, in characters.
pub const MAX_COMMENT_LEN: usize = 500;

/// Kind of media evidence attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl FromStr for MediaType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            other => Err(ValidationError::InvalidMediaType(other.to_string())),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reverse-geocoded place description.
///
/// Every field is optional; mobile clients send whatever their geocoder
/// produced. Named fields (rather than an open map) keep the stored shape
/// inspectable and queryable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_country_code: Option<String>,
}

/// Where a report was captured.
///
/// Coordinates and address are independent: an address may be present
/// without coordinates and vice versa. Fields are latitude-first here;
/// the derived [`GeoPoint`] is longitude-first (GeoJSON convention).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 14.5995)]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 120.9842)]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Client capture time, epoch milliseconds on the wire.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>, example = 1719820800000_i64)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Location {
    /// Derive the GeoJSON point for this location.
    ///
    /// Present iff both coordinates are present; address alone never yields
    /// a point. This is the only place `geoLocation` is computed.
    pub fn geo_point(&self) -> Option<GeoPoint> {
        match (self.longitude, self.latitude) {
            (Some(longitude), Some(latitude)) => Some(GeoPoint::new(longitude, latitude)),
            _ => None,
        }
    }

    /// Check coordinates against valid geographic ranges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(latitude) = self.latitude {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(ValidationError::LatitudeOutOfRange(latitude));
            }
        }
        if let Some(longitude) = self.longitude {
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(ValidationError::LongitudeOutOfRange(longitude));
            }
        }
        Ok(())
    }
}

/// Input for creating a new noise report.
#[derive(Debug, Clone)]
pub struct NoiseReportInput {
    pub media_url: String,
    pub media_type: MediaType,
    pub reason: String,
    pub comment: Option<String>,
    pub location: Option<Location>,
}

impl NoiseReportInput {
    /// Validate everything except the media URL.
    ///
    /// The submission service calls this before uploading the media file, so
    /// a bad comment or out-of-range coordinate is rejected without leaving
    /// an orphaned upload behind.
    pub fn validate_metadata(&self) -> Result<(), ValidationError> {
        if self.reason.trim().is_empty() {
            return Err(ValidationError::MissingField("reason"));
        }
        if let Some(ref comment) = self.comment {
            let len = comment.chars().count();
            if len > MAX_COMMENT_LEN {
                return Err(ValidationError::CommentTooLong {
                    len,
                    max: MAX_COMMENT_LEN,
                });
            }
        }
        if let Some(ref location) = self.location {
            location.validate()?;
        }
        Ok(())
    }

    /// Validate the complete input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.media_url.trim().is_empty() {
            return Err(ValidationError::MissingField("mediaUrl"));
        }
        self.validate_metadata()
    }
}

/// The persisted record of one noise complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoiseReport {
    /// Unique report identifier
    #[serde(rename = "_id")]
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    /// URL of the externally stored audio or video evidence
    #[schema(example = "https://media.example.com/video/upload/abc123.m4a")]
    pub media_url: String,

    /// Kind of the stored media file
    pub media_type: MediaType,

    /// Short classification of the disturbance
    #[schema(example = "Loud Music")]
    pub reason: String,

    /// Optional free-text elaboration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Capture location as submitted by the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// GeoJSON point derived from `location`, present iff both coordinates are
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<GeoPoint>,

    /// When the report was created, set once
    #[schema(value_type = String, example = "2026-07-01T10:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl NoiseReport {
    /// Validate the input and materialize the stored document.
    ///
    /// Assigns the id and creation time and derives `geo_location` from the
    /// location coordinates. An empty comment collapses to absent.
    pub fn create(input: NoiseReportInput) -> Result<Self, ValidationError> {
        input.validate()?;

        let geo_location = input.location.as_ref().and_then(Location::geo_point);

        Ok(Self {
            id: Uuid::new_v4(),
            media_url: input.media_url,
            media_type: input.media_type,
            reason: input.reason,
            comment: input.comment.filter(|c| !c.trim().is_empty()),
            location: input.location,
            geo_location,
            created_at: Utc::now(),
        })
    }
}
