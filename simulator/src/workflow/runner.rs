use crate::workflow::config::{validate_series, WorkflowConfig};
use crate::workflow::tasks::{ScheduledTask, TaskKind, TaskOutcome};
use anyhow::Context;
use cellcore::prelude::{
    aggregate, generate_fleet, sample_series, AggregateRecord, CellType, FleetSnapshot,
    OperatingMode, SeriesRecord,
};
use cellcore::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use cellcore::{SimError, SimResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// One dashboard frame: the fleet snapshot and its summary.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResult {
    pub mode: OperatingMode,
    pub snapshot: FleetSnapshot,
    pub summary: AggregateRecord,
}

/// Metrics plotted on the performance view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    AvgVoltage,
    AvgCurrent,
    AvgTemp,
    TotalCapacity,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::AvgVoltage,
        Metric::AvgCurrent,
        Metric::AvgTemp,
        Metric::TotalCapacity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::AvgVoltage => "Avg Voltage",
            Metric::AvgCurrent => "Avg Current",
            Metric::AvgTemp => "Avg Temp",
            Metric::TotalCapacity => "Total Capacity",
        }
    }

    pub fn value(self, record: &AggregateRecord) -> f64 {
        match self {
            Metric::AvgVoltage => record.avg_voltage,
            Metric::AvgCurrent => record.avg_current,
            Metric::AvgTemp => record.avg_temperature,
            Metric::TotalCapacity => record.total_capacity,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', '_'], " ");
        Metric::ALL
            .into_iter()
            .find(|metric| metric.label().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("unknown metric: {}", s))
    }
}

/// Series sampled across modes for the performance view.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceResult {
    pub records: Vec<SeriesRecord>,
}

impl PerformanceResult {
    /// `(time_index, mode, value)` points for one metric, in series order.
    pub fn metric_series(&self, metric: Metric) -> Vec<(usize, OperatingMode, f64)> {
        self.records
            .iter()
            .map(|record| {
                (
                    record.time_index,
                    record.mode,
                    metric.value(&record.aggregate),
                )
            })
            .collect()
    }
}

/// Drives the core on behalf of the CLI and the HTTP bridge.
///
/// The runner owns scheduling (iteration counts, sleeps) and validation;
/// the core calls it makes stay stateless.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Validated selection from the configuration.
    pub fn selection(&self) -> anyhow::Result<Vec<CellType>> {
        self.guard(self.config.selection())
            .context("validating configured cell selection")
    }

    /// Records and logs a rejected selection before handing the error back.
    pub fn guard<T>(&self, result: SimResult<T>) -> SimResult<T> {
        if let Err(err) = &result {
            self.metrics.record_rejected();
            let logger = LogManager::new();
            match err {
                SimError::InvalidSelection => {
                    logger.warning("Please select at least one cell type.")
                }
                other => logger.warning(&format!("rejected request: {}", other)),
            }
        }
        result
    }

    pub fn dashboard<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        selection: &[CellType],
        mode: OperatingMode,
    ) -> anyhow::Result<DashboardResult> {
        if selection.is_empty() {
            self.guard::<()>(Err(SimError::InvalidSelection))?;
        }
        let snapshot = generate_fleet(rng, selection, mode);
        let summary = aggregate(&snapshot).context("aggregating fleet snapshot")?;
        self.metrics.record_snapshot(snapshot.len());

        Ok(DashboardResult {
            mode,
            snapshot,
            summary,
        })
    }

    pub fn run_dashboard<R: Rng + ?Sized>(&self, rng: &mut R) -> anyhow::Result<DashboardResult> {
        let selection = self.selection()?;
        self.dashboard(rng, &selection, self.config.mode)
    }

    /// Generates `realtime.iterations` frames, sleeping `realtime.interval_ms`
    /// between them, and hands each one to `sink`.
    pub fn run_realtime<R, F>(&self, rng: &mut R, mut sink: F) -> anyhow::Result<usize>
    where
        R: Rng + ?Sized,
        F: FnMut(usize, &DashboardResult) -> anyhow::Result<()>,
    {
        let selection = self.selection()?;
        let interval = Duration::from_millis(self.config.realtime.interval_ms);
        let iterations = self.config.realtime.iterations;

        for iteration in 0..iterations {
            if iteration > 0 && !interval.is_zero() {
                thread::sleep(interval);
            }
            let frame = self
                .dashboard(rng, &selection, self.config.mode)
                .with_context(|| format!("generating real-time frame {}", iteration))?;
            sink(iteration, &frame)
                .with_context(|| format!("publishing real-time frame {}", iteration))?;
        }

        LogManager::new().record("Real-time monitoring session completed.");
        Ok(iterations)
    }

    pub fn series<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        selection: &[CellType],
        modes: &[OperatingMode],
        steps_per_mode: usize,
    ) -> anyhow::Result<PerformanceResult> {
        if selection.is_empty() {
            self.guard::<()>(Err(SimError::InvalidSelection))?;
        }
        self.guard(validate_series(modes, steps_per_mode))
            .context("validating series request")?;
        let records = sample_series(rng, modes, steps_per_mode, selection)
            .context("sampling performance series")?;
        for _ in 0..records.len() {
            self.metrics.record_snapshot(selection.len());
        }
        Ok(PerformanceResult { records })
    }

    pub fn run_performance<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> anyhow::Result<PerformanceResult> {
        let selection = self.selection()?;
        let performance = &self.config.performance;
        self.series(
            rng,
            &selection,
            &performance.modes,
            performance.steps_per_mode,
        )
    }

    pub fn run_task(&self, kind: TaskKind, minutes: u32) -> anyhow::Result<TaskOutcome> {
        let task = ScheduledTask::new(kind, minutes).context("scheduling task")?;
        LogManager::new().record(&task.describe());
        Ok(task.execute(Duration::from_millis(self.config.task.delay_ms)))
    }
}
