//! Report store module
//!
//! Durable storage for noise reports:
//! - **PostgreSQL** (production): persisted `noise_reports` table with a
//!   geography index for "reports near X" queries.
//! - **In-memory** (development fallback and tests): records are lost on
//!   restart.
//!
//! If `DATABASE_URL` is not set, falls back to in-memory storage.
//!
//! Records are write-once: the store exposes no update operation, and every
//! record is validated and fully materialized (id, creation time, derived
//! GeoJSON point) before any backend write happens. Deletion is not part of
//! the contract either.

mod memory;
mod postgres;

pub use memory::MemoryReportStore;
pub use postgres::PostgresReportStore;

use noisewatch_core::{NoiseReport, NoiseReportInput, ValidationError};
use uuid::Uuid;

use crate::config::Config;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Query(e.to_string())
    }
}

/// Filter for list queries.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Case-sensitive substring match against `reason`
    pub reason: Option<String>,
}

/// Report storage backend
enum StoreBackend {
    /// PostgreSQL storage (production)
    Postgres(PostgresReportStore),
    /// In-memory storage (development fallback)
    Memory(MemoryReportStore),
}

/// Unified report store over the configured backend
pub struct ReportStore {
    backend: StoreBackend,
}

impl ReportStore {
    /// Create a store with a PostgreSQL backend
    pub async fn with_postgres(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, StoreError> {
        let pg_store = PostgresReportStore::new(database_url, max_connections).await?;

        Ok(Self {
            backend: StoreBackend::Postgres(pg_store),
        })
    }

    /// Create a store with an in-memory backend (development only)
    pub fn in_memory() -> Self {
        tracing::warn!("Using in-memory report storage - reports will be lost on restart!");
        Self {
            backend: StoreBackend::Memory(MemoryReportStore::new()),
        }
    }

    /// Create the store from environment
    ///
    /// Uses PostgreSQL if `DATABASE_URL` is set, otherwise falls back to in-memory.
    pub async fn from_env(config: &Config) -> Result<Self, StoreError> {
        match std::env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => {
                tracing::info!("Using PostgreSQL report storage");
                Self::with_postgres(&url, config.database_max_connections).await
            }
            _ => {
                tracing::warn!("DATABASE_URL not set, using in-memory report storage");
                Ok(Self::in_memory())
            }
        }
    }

    /// Check if using persistent storage
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StoreBackend::Postgres(_))
    }

    /// Check database health (always Ok for memory backend)
    pub async fn check_health(&self) -> Result<(), StoreError> {
        match &self.backend {
            StoreBackend::Postgres(pg) => pg.check_health().await,
            StoreBackend::Memory(_) => Ok(()),
        }
    }

    /// Create a new report from validated input
    ///
    /// Validation and GeoJSON derivation happen before the backend write, so
    /// a `ValidationError` never leaves a partial record behind. Persistence
    /// failures surface as-is; there is no retry.
    pub async fn create(&self, input: NoiseReportInput) -> Result<NoiseReport, StoreError> {
        let report = NoiseReport::create(input)?;

        match &self.backend {
            StoreBackend::Postgres(pg) => pg.insert(&report).await?,
            StoreBackend::Memory(mem) => mem.insert(report.clone()),
        }

        tracing::debug!(report_id = %report.id, "Stored noise report");

        Ok(report)
    }

    /// List reports, newest first, optionally filtered by reason substring
    pub async fn list(&self, filter: &ReportFilter) -> Result<Vec<NoiseReport>, StoreError> {
        match &self.backend {
            StoreBackend::Postgres(pg) => pg.list(filter).await,
            StoreBackend::Memory(mem) => Ok(mem.list(filter)),
        }
    }

    /// Get a single report by id
    pub async fn get(&self, id: Uuid) -> Result<Option<NoiseReport>, StoreError> {
        match &self.backend {
            StoreBackend::Postgres(pg) => pg.get(id).await,
            StoreBackend::Memory(mem) => Ok(mem.get(id)),
        }
    }

    /// List reports whose derived point lies within the radius, nearest first
    ///
    /// Reports without coordinates never match.
    pub async fn near(
        &self,
        longitude: f64,
        latitude: f64,
        max_distance_meters: f64,
    ) -> Result<Vec<NoiseReport>, StoreError> {
        match &self.backend {
            StoreBackend::Postgres(pg) => pg.near(longitude, latitude, max_distance_meters).await,
            StoreBackend::Memory(mem) => Ok(mem.near(longitude, latitude, max_distance_meters)),
        }
    }

    /// Count stored reports
    pub async fn count(&self) -> Result<i64, StoreError> {
        match &self.backend {
            StoreBackend::Postgres(pg) => pg.count().await,
            StoreBackend::Memory(mem) => Ok(mem.count() as i64),
        }
    }
}

impl std::fmt::Debug for ReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            StoreBackend::Postgres(_) => "PostgreSQL",
            StoreBackend::Memory(_) => "Memory",
        };
        f.debug_struct("ReportStore").field("backend", &backend).finish()
    }
}
