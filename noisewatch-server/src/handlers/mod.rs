//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod health;
pub mod reports;

pub use crate::state::AppState;
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use reports::{
    get_report_handler, list_reports_handler, near_reports_handler, submit_report_handler,
    ListReportsQuery, NearReportsQuery,
};
