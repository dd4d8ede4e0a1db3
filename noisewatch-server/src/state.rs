//! Application state module
//!
//! Defines shared state accessible across all request handlers. All request
//! context flows through this struct via the axum `State` extractor; there
//! are no ambient singletons.

use std::sync::Arc;

use crate::media_store::MediaStore;
use crate::report_store::ReportStore;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Durable report storage (PostgreSQL or in-memory fallback)
    pub report_store: Arc<ReportStore>,
    /// External media storage collaborator
    pub media_store: Arc<dyn MediaStore>,
    /// Maximum accepted media file size in bytes
    pub max_file_size: usize,
}
