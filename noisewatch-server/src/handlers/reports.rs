//! Noise report handlers
//!
//! Report submission (multipart upload plus store write) and query endpoints.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use noisewatch_core::{Location, MediaType, NoiseReport, NoiseReportInput, ValidationError};

use crate::error::ApiError;
use crate::media_store::MediaUpload;
use crate::multipart::MultipartFields;
use crate::report_store::ReportFilter;
use crate::state::AppState;
use crate::validation::validate_media_agreement;

/// Submit a noise report
///
/// Accepts multipart/form-data with:
/// - **media** (required): the audio or video evidence file
/// - **reason** (required): short classification, e.g. "Loud Music"
/// - **mediaType** (required): "audio" or "video", must match the file
/// - **comment** (optional): free text, up to 500 characters
/// - **location** (optional): JSON-encoded
///   `{latitude, longitude, address, timestamp}`
///
/// The media file is uploaded to external storage first; the report record
/// is written only after the upload succeeded. Both steps run exactly once —
/// any failure is surfaced immediately to the caller.
///
/// Known gaps carried over from the submission contract: a store failure
/// after a successful upload leaves the uploaded file orphaned, and there is
/// no idempotency key, so a client retrying a timed-out request can create a
/// duplicate record.
#[utoipa::path(
    post,
    path = "/reports/new-report",
    tag = "Reports",
    request_body(
        content_type = "multipart/form-data",
        description = "Media evidence plus report metadata"
    ),
    responses(
        (status = 201, description = "Report created", body = NoiseReport),
        (status = 400, description = "Missing or invalid fields"),
        (status = 502, description = "Media upload failed"),
        (status = 500, description = "Report persistence failed")
    )
)]
pub async fn submit_report_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<NoiseReport>), ApiError> {
    let fields = MultipartFields::parse(&mut multipart, state.max_file_size).await?;

    let media = fields.require_media()?;
    if media.data.is_empty() {
        return Err(ApiError::bad_request("No content: media file is empty"));
    }

    let media_type: MediaType = fields
        .get_text("mediaType")
        .ok_or(ValidationError::MissingField("mediaType"))?
        .parse()?;
    validate_media_agreement(media.content_type.as_deref(), media_type)?;

    let reason = fields
        .get_text("reason")
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or(ValidationError::MissingField("reason"))?
        .to_string();

    let comment = fields.get_text("comment").map(|c| c.to_string());
    let location: Option<Location> = fields.get_json("location")?;

    // Reject bad metadata before the upload so a validation error cannot
    // leave an orphaned file in external storage.
    let mut input = NoiseReportInput {
        media_url: String::new(),
        media_type,
        reason,
        comment,
        location,
    };
    input.validate_metadata()?;

    let stored = state
        .media_store
        .upload(MediaUpload {
            data: media.data.clone(),
            content_type: media.content_type.clone(),
            file_name: media.file_name.clone(),
            media_type,
        })
        .await?;

    input.media_url = stored.url;
    let report = state.report_store.create(input).await?;

    tracing::info!(
        report_id = %report.id,
        media_type = %report.media_type,
        reason = %report.reason,
        "Noise report created"
    );

    Ok((StatusCode::CREATED, Json(report)))
}

/// Query parameters for listing reports
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListReportsQuery {
    /// Case-sensitive substring filter on `reason`
    pub reason: Option<String>,
}

/// List stored reports
///
/// Returns all stored reports, newest first. With `?reason=`, keeps only
/// reports whose reason contains the given string (case-sensitive).
#[utoipa::path(
    get,
    path = "/reports/get-report",
    tag = "Reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Stored reports", body = [NoiseReport]),
        (status = 500, description = "Report store unavailable")
    )
)]
pub async fn list_reports_handler(
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<Vec<NoiseReport>>, ApiError> {
    let filter = ReportFilter {
        reason: query.reason,
    };

    let reports = state.report_store.list(&filter).await?;

    Ok(Json(reports))
}

/// Query parameters for the radius query
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NearReportsQuery {
    /// Query point longitude
    pub longitude: f64,
    /// Query point latitude
    pub latitude: f64,
    /// Search radius in meters
    pub max_distance_meters: f64,
}

/// List reports near a point
///
/// Returns reports whose derived GeoJSON point lies within
/// `maxDistanceMeters` of the query point, nearest first. Reports without
/// coordinates never match.
#[utoipa::path(
    get,
    path = "/reports/near",
    tag = "Reports",
    params(NearReportsQuery),
    responses(
        (status = 200, description = "Reports within the radius, nearest first", body = [NoiseReport]),
        (status = 400, description = "Coordinates out of range"),
        (status = 500, description = "Report store unavailable")
    )
)]
pub async fn near_reports_handler(
    State(state): State<AppState>,
    Query(query): Query<NearReportsQuery>,
) -> Result<Json<Vec<NoiseReport>>, ApiError> {
    if !(-90.0..=90.0).contains(&query.latitude) {
        return Err(ValidationError::LatitudeOutOfRange(query.latitude).into());
    }
    if !(-180.0..=180.0).contains(&query.longitude) {
        return Err(ValidationError::LongitudeOutOfRange(query.longitude).into());
    }
    if !query.max_distance_meters.is_finite() || query.max_distance_meters <= 0.0 {
        return Err(ApiError::bad_request("maxDistanceMeters must be positive"));
    }

    let reports = state
        .report_store
        .near(query.longitude, query.latitude, query.max_distance_meters)
        .await?;

    Ok(Json(reports))
}

/// Get a single report by id
#[utoipa::path(
    get,
    path = "/reports/{report_id}",
    tag = "Reports",
    params(
        ("report_id" = String, Path, description = "Report ID (UUID)")
    ),
    responses(
        (status = 200, description = "The report", body = NoiseReport),
        (status = 404, description = "No report with this id"),
        (status = 500, description = "Report store unavailable")
    )
)]
pub async fn get_report_handler(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<NoiseReport>, ApiError> {
    let report = state
        .report_store
        .get(report_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No report with id {report_id}")))?;

    Ok(Json(report))
}
