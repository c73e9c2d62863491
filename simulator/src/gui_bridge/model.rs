use cellcore::prelude::{AggregateRecord, OperatingMode, Reading, SeriesRecord};
use cellcore::telemetry::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// Latest data a front end needs to draw metrics, tables and charts.
#[derive(Debug, Clone, Serialize, Default)]
pub struct VisualizationModel {
    pub mode: Option<OperatingMode>,
    pub readings: Vec<Reading>,
    pub summary: Option<AggregateRecord>,
    pub series: Vec<SeriesRecord>,
    pub metrics: MetricsSnapshot,
    pub status: String,
}

/// Body of `POST /ingest-config`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardRequest {
    pub cells: Vec<String>,
    #[serde(default)]
    pub mode: OperatingMode,
}

fn default_series_modes() -> Vec<OperatingMode> {
    OperatingMode::ALL.to_vec()
}

fn default_steps() -> usize {
    10
}

/// Body of `POST /series`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesRequest {
    pub cells: Vec<String>,
    #[serde(default = "default_series_modes")]
    pub modes: Vec<OperatingMode>,
    #[serde(default = "default_steps")]
    pub steps_per_mode: usize,
}
