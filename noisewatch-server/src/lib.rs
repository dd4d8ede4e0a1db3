//! Noisewatch Server Library - REST API components for noise-complaint reports
//!
//! This library exposes the server components for use in integration tests.
//! The main binary uses these same components.

pub mod config;
pub mod error;
pub mod handlers;
pub mod media_store;
pub mod multipart;
pub mod openapi;
pub mod report_store;
pub mod routes;
pub mod state;
pub mod validation;

pub use config::Config;
pub use error::ApiError;
pub use media_store::{
    HttpMediaStore, MediaStore, MediaStoreError, MediaUpload, MemoryMediaStore, StoredMedia,
};
pub use openapi::ApiDoc;
pub use report_store::{
    MemoryReportStore, PostgresReportStore, ReportFilter, ReportStore, StoreError,
};
pub use routes::{create_router, create_router_with_state};
pub use state::AppState;
