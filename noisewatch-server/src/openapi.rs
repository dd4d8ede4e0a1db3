//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3.0 specification for the Noisewatch reports API.

use utoipa::OpenApi;

use noisewatch_core::{Address, GeoPoint, Location, MediaType, NoiseReport};

use crate::handlers::{HealthResponse, ReadyResponse};

/// Noisewatch Reports API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Noisewatch Reports API",
        version = "0.1.0",
        description = r#"
## Noise-complaint report API

Backend for the Noisewatch mobile app. Citizens submit geolocated noise
reports with audio or video evidence; the dashboard queries them back.

### How it works

1. The app records evidence and submits it via `POST /reports/new-report`
   (multipart: media file, reason, media type, optional comment/location)
2. The media file is stored externally; the report record keeps its URL
3. Reports carry a derived GeoJSON point (`geoLocation`, longitude-first)
   so they can be filtered by reason or queried by distance
4. Records are write-once: there is no edit endpoint
"#,
        license(
            name = "MIT OR Apache-2.0",
            url = "https://github.com/noisewatch/noisewatch/blob/main/LICENSE"
        ),
        contact(
            name = "Noisewatch Team",
            url = "https://github.com/noisewatch/noisewatch"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Reports", description = "Submit and query noise-complaint reports"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::reports::submit_report_handler,
        crate::handlers::reports::list_reports_handler,
        crate::handlers::reports::near_reports_handler,
        crate::handlers::reports::get_report_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            NoiseReport,
            MediaType,
            Location,
            Address,
            GeoPoint,
        )
    )
)]
pub struct ApiDoc;
