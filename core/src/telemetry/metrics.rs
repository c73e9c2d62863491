use serde::Serialize;
use std::sync::Mutex;

/// Counters for generation calls made on behalf of a front end.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub snapshots: usize,
    pub readings: usize,
    pub rejected: usize,
}

#[derive(Default)]
struct Metrics {
    snapshots: usize,
    readings: usize,
    rejected: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_snapshot(&self, readings: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.snapshots += 1;
            metrics.readings += readings;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                snapshots: metrics.snapshots,
                readings: metrics.readings,
                rejected: metrics.rejected,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_counts_snapshots_and_rejections() {
        let recorder = MetricsRecorder::new();
        recorder.record_snapshot(3);
        recorder.record_snapshot(2);
        recorder.record_rejected();
        assert_eq!(
            recorder.snapshot(),
            MetricsSnapshot {
                snapshots: 2,
                readings: 5,
                rejected: 1,
            }
        );
    }
}
