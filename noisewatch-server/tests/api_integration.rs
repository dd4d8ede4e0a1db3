//! API integration tests for noisewatch-server.
//!
//! These tests verify the HTTP API behavior with realistic multipart
//! requests, driving the full submit/query flow through the REST endpoints
//! against in-memory storage backends.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use noisewatch_server::{
    create_router, create_router_with_state, AppState, Config, MediaStore, MediaStoreError,
    MediaUpload, MemoryMediaStore, ReportStore, StoredMedia,
};

const BOUNDARY: &str = "----TestBoundary7MA4YWxkTrZu0gW";

/// Optional fields of a report submission.
#[derive(Default)]
struct SubmitFields<'a> {
    media_type: Option<&'a str>,
    reason: Option<&'a str>,
    comment: Option<&'a str>,
    location: Option<&'a str>,
}

/// Helper to create a multipart body for a report submission
fn report_multipart(
    media: &[u8],
    media_content_type: &str,
    fields: &SubmitFields<'_>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    // Media file field
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"media\"; filename=\"evidence.m4a\"\r\n",
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", media_content_type).as_bytes());
    body.extend_from_slice(media);
    body.extend_from_slice(b"\r\n");

    // Text fields
    let text_fields = [
        ("mediaType", fields.media_type),
        ("reason", fields.reason),
        ("comment", fields.comment),
        ("location", fields.location),
    ];
    for (name, value) in text_fields {
        if let Some(value) = value {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            );
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
    }

    // End boundary
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// Build the test router using the library's create_router function
fn create_test_app() -> Router {
    create_router()
}

/// Submit a report and return the response
async fn submit(app: &Router, content_type: &str, body: Vec<u8>) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reports/new-report")
                .header("Content-Type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// GET a path and return the parsed JSON body with the status
async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    (status, json)
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Submit a minimal valid audio report with the given reason
async fn submit_simple(app: &Router, reason: &str, location: Option<&str>) -> Value {
    let (content_type, body) = report_multipart(
        b"fake aac bytes",
        "audio/mp4",
        &SubmitFields {
            media_type: Some("audio"),
            reason: Some(reason),
            location,
            ..SubmitFields::default()
        },
    );

    let response = submit(app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::CREATED, "submit of '{reason}' failed");
    response_json(response).await
}

// ============================================================================
// Health & Readiness Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    // Test router runs on the in-memory backend
    assert_eq!(json["store_persistent"], false);
}

#[tokio::test]
async fn test_ready_endpoint_returns_ok() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ready"], true);
}

// ============================================================================
// Report Submission Tests
// ============================================================================

#[tokio::test]
async fn test_submit_report_with_location_creates_record() {
    let app = create_test_app();

    let location = r#"{"latitude":14.5995,"longitude":120.9842,"address":{"city":"Manila","country":"Philippines"},"timestamp":1719820800000}"#;
    let (content_type, body) = report_multipart(
        b"fake aac bytes",
        "audio/mp4",
        &SubmitFields {
            media_type: Some("audio"),
            reason: Some("Loud Music"),
            comment: Some(""),
            location: Some(location),
        },
    );

    let response = submit(&app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = response_json(response).await;

    assert!(json["_id"].is_string(), "response should contain _id");
    assert_eq!(json["mediaType"], "audio");
    assert_eq!(json["reason"], "Loud Music");
    assert!(
        json["mediaUrl"].as_str().unwrap().starts_with("memory://media/"),
        "mediaUrl should point at stored media"
    );
    assert!(json["createdAt"].is_string());
    // Empty comment collapses to absent
    assert!(json.get("comment").is_none());

    // GeoJSON point is longitude-first, the inverse of the location fields
    assert_eq!(json["geoLocation"]["type"], "Point");
    assert_eq!(
        json["geoLocation"]["coordinates"],
        serde_json::json!([120.9842, 14.5995])
    );
    assert_eq!(json["location"]["latitude"], 14.5995);
    assert_eq!(json["location"]["address"]["city"], "Manila");
}

#[tokio::test]
async fn test_submit_report_without_location() {
    let app = create_test_app();

    let (content_type, body) = report_multipart(
        b"fake mp4 bytes",
        "video/mp4",
        &SubmitFields {
            media_type: Some("video"),
            reason: Some("Construction"),
            comment: Some("Jackhammer since 6am"),
            ..SubmitFields::default()
        },
    );

    let response = submit(&app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = response_json(response).await;
    assert_eq!(json["mediaType"], "video");
    assert_eq!(json["comment"], "Jackhammer since 6am");
    // No coordinates, no derived point
    assert!(json.get("location").is_none());
    assert!(json.get("geoLocation").is_none());
}

#[tokio::test]
async fn test_submit_rejects_empty_media() {
    let app = create_test_app();

    let (content_type, body) = report_multipart(
        b"",
        "audio/mp4",
        &SubmitFields {
            media_type: Some("audio"),
            reason: Some("Loud Music"),
            ..SubmitFields::default()
        },
    );

    let response = submit(&app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().contains("No content"));

    // No record was created
    let (_, reports) = get_json(&app, "/reports/get-report").await;
    assert_eq!(reports.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_submit_rejects_missing_media_field() {
    let app = create_test_app();

    // Multipart with metadata but no media field
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"reason\"\r\n\r\nLoud Music\r\n--{b}--\r\n",
        b = BOUNDARY
    );

    let response = submit(
        &app,
        &format!("multipart/form-data; boundary={}", BOUNDARY),
        body.into_bytes(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_rejects_missing_reason() {
    let app = create_test_app();

    let (content_type, body) = report_multipart(
        b"fake aac bytes",
        "audio/mp4",
        &SubmitFields {
            media_type: Some("audio"),
            ..SubmitFields::default()
        },
    );

    let response = submit(&app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().contains("reason"));
}

#[tokio::test]
async fn test_submit_rejects_bad_media_type() {
    let app = create_test_app();

    let (content_type, body) = report_multipart(
        b"fake bytes",
        "application/octet-stream",
        &SubmitFields {
            media_type: Some("image"),
            reason: Some("Loud Music"),
            ..SubmitFields::default()
        },
    );

    let response = submit(&app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().contains("mediaType"));
}

#[tokio::test]
async fn test_submit_rejects_media_type_disagreement() {
    let app = create_test_app();

    // File says video, declaration says audio
    let (content_type, body) = report_multipart(
        b"fake mp4 bytes",
        "video/mp4",
        &SubmitFields {
            media_type: Some("audio"),
            reason: Some("Loud Music"),
            ..SubmitFields::default()
        },
    );

    let response = submit(&app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_rejects_out_of_range_latitude() {
    let app = create_test_app();

    let (content_type, body) = report_multipart(
        b"fake aac bytes",
        "audio/mp4",
        &SubmitFields {
            media_type: Some("audio"),
            reason: Some("Loud Music"),
            location: Some(r#"{"latitude":95.0,"longitude":120.9842}"#),
            ..SubmitFields::default()
        },
    );

    let response = submit(&app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().contains("latitude"));

    // Nothing was written
    let (_, reports) = get_json(&app, "/reports/get-report").await;
    assert_eq!(reports.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_submit_rejects_invalid_location_json() {
    let app = create_test_app();

    let (content_type, body) = report_multipart(
        b"fake aac bytes",
        "audio/mp4",
        &SubmitFields {
            media_type: Some("audio"),
            reason: Some("Loud Music"),
            location: Some("{not json"),
            ..SubmitFields::default()
        },
    );

    let response = submit(&app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Report Query Tests
// ============================================================================

#[tokio::test]
async fn test_list_reports_reason_filter() {
    let app = create_test_app();

    submit_simple(&app, "Construction", None).await;
    submit_simple(&app, "Traffic", None).await;
    submit_simple(&app, "Construction Noise", None).await;

    // Substring filter keeps both Construction variants
    let (status, json) = get_json(&app, "/reports/get-report?reason=Construction").await;
    assert_eq!(status, StatusCode::OK);
    let reports = json.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    for report in reports {
        assert!(report["reason"].as_str().unwrap().contains("Construction"));
    }

    // Unfiltered returns everything
    let (_, json) = get_json(&app, "/reports/get-report").await;
    assert_eq!(json.as_array().unwrap().len(), 3);

    // Filter is case-sensitive
    let (_, json) = get_json(&app, "/reports/get-report?reason=construction").await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_near_reports_nearest_first() {
    let app = create_test_app();

    // ~1.1 km and ~11 km north of the query point, plus one with no location
    submit_simple(
        &app,
        "Karaoke",
        Some(r#"{"latitude":14.6095,"longitude":120.9842}"#),
    )
    .await;
    submit_simple(
        &app,
        "Construction",
        Some(r#"{"latitude":14.6995,"longitude":120.9842}"#),
    )
    .await;
    submit_simple(&app, "Traffic", None).await;

    // Small radius: only the close one
    let (status, json) = get_json(
        &app,
        "/reports/near?longitude=120.9842&latitude=14.5995&maxDistanceMeters=5000",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reports = json.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["reason"], "Karaoke");

    // Large radius: both, nearest first
    let (_, json) = get_json(
        &app,
        "/reports/near?longitude=120.9842&latitude=14.5995&maxDistanceMeters=20000",
    )
    .await;
    let reports = json.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["reason"], "Karaoke");
    assert_eq!(reports[1]["reason"], "Construction");
}

#[tokio::test]
async fn test_near_reports_rejects_bad_coordinates() {
    let app = create_test_app();

    let (status, json) = get_json(
        &app,
        "/reports/near?longitude=200&latitude=14.5995&maxDistanceMeters=1000",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let (status, _) = get_json(
        &app,
        "/reports/near?longitude=120.9842&latitude=14.5995&maxDistanceMeters=0",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_report_by_id() {
    let app = create_test_app();

    let created = submit_simple(
        &app,
        "Loud Music",
        Some(r#"{"latitude":14.5995,"longitude":120.9842}"#),
    )
    .await;
    let id = created["_id"].as_str().unwrap();

    let (status, json) = get_json(&app, &format!("/reports/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["_id"], created["_id"]);
    assert_eq!(json["reason"], "Loud Music");
    assert_eq!(
        json["geoLocation"]["coordinates"],
        serde_json::json!([120.9842, 14.5995])
    );
}

#[tokio::test]
async fn test_get_report_unknown_id_is_not_found() {
    let app = create_test_app();

    let (status, json) = get_json(
        &app,
        "/reports/550e8400-e29b-41d4-a716-446655440000",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ============================================================================
// Failure Semantics Tests
// ============================================================================

/// Media store that always fails, simulating an upload-collaborator outage
struct FailingMediaStore;

#[async_trait::async_trait]
impl MediaStore for FailingMediaStore {
    async fn upload(&self, _upload: MediaUpload) -> Result<StoredMedia, MediaStoreError> {
        Err(MediaStoreError::Upload("simulated outage".to_string()))
    }
}

#[tokio::test]
async fn test_upload_failure_surfaces_and_writes_no_record() {
    let config = Config::default();
    let state = AppState {
        report_store: Arc::new(ReportStore::in_memory()),
        media_store: Arc::new(FailingMediaStore),
        max_file_size: config.max_file_size(),
    };
    let app = create_router_with_state(&config, state);

    let (content_type, body) = report_multipart(
        b"fake aac bytes",
        "audio/mp4",
        &SubmitFields {
            media_type: Some("audio"),
            reason: Some("Loud Music"),
            ..SubmitFields::default()
        },
    );

    let response = submit(&app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = response_json(response).await;
    assert_eq!(json["code"], "STORAGE_ERROR");
    // Generic retry message, no internal detail
    assert!(!json["message"].as_str().unwrap().contains("simulated"));

    // No record is queryable after the failed submission
    let (_, reports) = get_json(&app, "/reports/get-report").await;
    assert_eq!(reports.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_validation_failure_uploads_nothing() {
    // A metadata validation error must be caught before the upload attempt
    let media = Arc::new(MemoryMediaStore::new());
    let config = Config::default();
    let state = AppState {
        report_store: Arc::new(ReportStore::in_memory()),
        media_store: media.clone(),
        max_file_size: config.max_file_size(),
    };
    let app = create_router_with_state(&config, state);

    let (content_type, body) = report_multipart(
        b"fake aac bytes",
        "audio/mp4",
        &SubmitFields {
            media_type: Some("audio"),
            reason: Some("Loud Music"),
            location: Some(r#"{"latitude":95.0,"longitude":0.0}"#),
            ..SubmitFields::default()
        },
    );

    let response = submit(&app, &content_type, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(media.is_empty(), "no media should be uploaded for invalid input");
}

// ============================================================================
// OpenAPI Documentation Tests
// ============================================================================

#[tokio::test]
async fn test_openapi_spec_endpoint() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["openapi"].as_str().unwrap().starts_with("3."));
    assert!(json["info"]["title"].is_string());
    assert!(json["paths"]["/reports/new-report"].is_object());
    assert!(json["paths"]["/reports/get-report"].is_object());
    assert!(json["paths"]["/reports/near"].is_object());
    assert!(json["paths"]["/health"].is_object());
}

#[tokio::test]
async fn test_swagger_ui_endpoint() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/docs/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Swagger UI should be accessible at /docs/"
    );
}
