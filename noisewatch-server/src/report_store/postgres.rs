//! PostgreSQL implementation of the report store.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use noisewatch_core::{Location, MediaType, NoiseReport};

use super::{ReportFilter, StoreError};

/// PostgreSQL-backed report store.
///
/// The `location` column holds the submitted location as JSONB (the source
/// of truth); `latitude`/`longitude` are duplicated into float columns so
/// the geography index can serve radius queries without unpacking JSON.
#[derive(Clone)]
pub struct PostgresReportStore {
    pool: PgPool,
}

/// Row type for database queries.
#[derive(FromRow)]
struct ReportRow {
    id: Uuid,
    media_url: String,
    media_type: String,
    reason: String,
    comment: Option<String>,
    location: Option<Json<Location>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for NoiseReport {
    type Error = StoreError;

    fn try_from(row: ReportRow) -> Result<Self, StoreError> {
        let media_type: MediaType = row.media_type.parse().map_err(|_| {
            StoreError::Serialization(format!(
                "unknown media type '{}' in report {}",
                row.media_type, row.id
            ))
        })?;

        let location = row.location.map(|json| json.0);
        let geo_location = location.as_ref().and_then(Location::geo_point);

        Ok(Self {
            id: row.id,
            media_url: row.media_url,
            media_type,
            reason: row.reason,
            comment: row.comment,
            location,
            geo_location,
            created_at: row.created_at,
        })
    }
}

const REPORT_COLUMNS: &str = "id, media_url, media_type, reason, comment, location, created_at";

impl PostgresReportStore {
    /// Create a new report store with the given database URL.
    ///
    /// Runs migrations automatically on connection.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        tracing::info!("Report store connected and migrations applied");

        Ok(Self { pool })
    }

    /// Create a report store from an existing pool (for testing).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check database connectivity.
    pub async fn check_health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }

    /// Insert one fully materialized report.
    pub async fn insert(&self, report: &NoiseReport) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO noise_reports (
                id, media_url, media_type, reason, comment,
                location, latitude, longitude, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(report.id)
        .bind(&report.media_url)
        .bind(report.media_type.as_str())
        .bind(&report.reason)
        .bind(&report.comment)
        .bind(report.location.as_ref().map(Json))
        .bind(report.location.as_ref().and_then(|l| l.latitude))
        .bind(report.location.as_ref().and_then(|l| l.longitude))
        .bind(report.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List reports, newest first, optionally filtered by reason substring.
    pub async fn list(&self, filter: &ReportFilter) -> Result<Vec<NoiseReport>, StoreError> {
        let rows: Vec<ReportRow> = if let Some(ref reason) = filter.reason {
            sqlx::query_as(&format!(
                r#"
                SELECT {REPORT_COLUMNS} FROM noise_reports
                WHERE reason LIKE '%' || $1 || '%'
                ORDER BY created_at DESC
                "#
            ))
            .bind(reason)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(&format!(
                r#"
                SELECT {REPORT_COLUMNS} FROM noise_reports
                ORDER BY created_at DESC
                "#
            ))
            .fetch_all(&self.pool)
            .await?
        };

        rows.into_iter().map(NoiseReport::try_from).collect()
    }

    /// Find a report by id.
    pub async fn get(&self, id: Uuid) -> Result<Option<NoiseReport>, StoreError> {
        let row: Option<ReportRow> = sqlx::query_as(&format!(
            r#"
            SELECT {REPORT_COLUMNS} FROM noise_reports WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(NoiseReport::try_from).transpose()
    }

    /// Radius query over the geography index, nearest first.
    ///
    /// Uses the same `ST_MakePoint(longitude, latitude)` expression as the
    /// GIST index in the migration so the planner can use it.
    pub async fn near(
        &self,
        longitude: f64,
        latitude: f64,
        max_distance_meters: f64,
    ) -> Result<Vec<NoiseReport>, StoreError> {
        let rows: Vec<ReportRow> = sqlx::query_as(&format!(
            r#"
            SELECT {REPORT_COLUMNS} FROM noise_reports
            WHERE latitude IS NOT NULL
              AND longitude IS NOT NULL
              AND ST_DWithin(
                    ST_SetSRID(ST_MakePoint(longitude, latitude), 4326)::geography,
                    ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
                    $3)
            ORDER BY ST_Distance(
                    ST_SetSRID(ST_MakePoint(longitude, latitude), 4326)::geography,
                    ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography)
            "#
        ))
        .bind(longitude)
        .bind(latitude)
        .bind(max_distance_meters)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(NoiseReport::try_from).collect()
    }

    /// Count total reports in the store.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM noise_reports")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
