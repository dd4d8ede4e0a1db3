//! In-memory report store (development fallback and tests).

use dashmap::DashMap;
use uuid::Uuid;

use noisewatch_core::{haversine_distance_meters, GeoPoint, NoiseReport};

use super::ReportFilter;

/// Non-persistent report storage backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: DashMap<Uuid, NoiseReport>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, report: NoiseReport) {
        self.reports.insert(report.id, report);
    }

    pub fn list(&self, filter: &ReportFilter) -> Vec<NoiseReport> {
        let mut reports: Vec<NoiseReport> = self
            .reports
            .iter()
            .filter(|entry| {
                filter
                    .reason
                    .as_deref()
                    .map_or(true, |reason| entry.value().reason.contains(reason))
            })
            .map(|entry| entry.value().clone())
            .collect();

        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports
    }

    pub fn get(&self, id: Uuid) -> Option<NoiseReport> {
        self.reports.get(&id).map(|entry| entry.value().clone())
    }

    /// Haversine scan, nearest first. Reports without a derived point never match.
    pub fn near(&self, longitude: f64, latitude: f64, max_distance_meters: f64) -> Vec<NoiseReport> {
        let origin = GeoPoint::new(longitude, latitude);

        let mut matches: Vec<(f64, NoiseReport)> = self
            .reports
            .iter()
            .filter_map(|entry| {
                let point = entry.value().geo_location.as_ref()?;
                let distance = haversine_distance_meters(point, &origin);
                (distance <= max_distance_meters).then(|| (distance, entry.value().clone()))
            })
            .collect();

        matches.sort_by(|a, b| a.0.total_cmp(&b.0));
        matches.into_iter().map(|(_, report)| report).collect()
    }

    pub fn count(&self) -> usize {
        self.reports.len()
    }
}
