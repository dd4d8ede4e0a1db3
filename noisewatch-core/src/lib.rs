//! Noisewatch Core - domain model for noise-complaint reports
//!
//! This crate defines the report record and its invariants, independent of
//! any storage or transport:
//!
//! - `NoiseReport` / `NoiseReportInput` with field validation
//! - Structured `Location`/`Address` value types (no open maps)
//! - Pure GeoJSON derivation: `geoLocation` is computed from the location
//!   coordinates, longitude-first, and exists iff both coordinates exist
//! - Haversine distance for in-memory "reports near X" queries
//!
//! # Example
//!
//! ```
//! use noisewatch_core::{Location, MediaType, NoiseReport, NoiseReportInput};
//!
//! let report = NoiseReport::create(NoiseReportInput {
//!     media_url: "https://media.example.com/video/upload/abc123.m4a".into(),
//!     media_type: MediaType::Audio,
//!     reason: "Loud Music".into(),
//!     comment: None,
//!     location: Some(Location {
//!         latitude: Some(14.5995),
//!         longitude: Some(120.9842),
//!         ..Location::default()
//!     }),
//! })?;
//!
//! // GeoJSON order is longitude-first, the inverse of the location fields.
//! assert_eq!(report.geo_location.unwrap().coordinates, [120.9842, 14.5995]);
//! # Ok::<(), noisewatch_core::ValidationError>(())
//! ```

pub mod error;
pub mod geo;
pub mod report;

pub use error::{Result, ValidationError};
pub use geo::{haversine_distance_meters, GeoPoint};
pub use report::{
    Address, Location, MediaType, NoiseReport, NoiseReportInput, MAX_COMMENT_LEN,
};
