use crate::workflow::runner::{DashboardResult, Metric, PerformanceResult};
use cellcore::prelude::AggregateRecord;
use std::fmt::Write;

pub fn metric_lines(summary: &AggregateRecord) -> [String; 4] {
    [
        format!("Avg Voltage {:.2} V", summary.avg_voltage),
        format!("Avg Current {:.2} A", summary.avg_current),
        format!("Avg Temp {:.1} °C", summary.avg_temperature),
        format!("Total Capacity {:.2} Wh", summary.total_capacity),
    ]
}

/// Key metrics followed by the per-cell table.
pub fn render_dashboard(result: &DashboardResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Key metrics ({})", result.mode);
    for line in metric_lines(&result.summary) {
        let _ = writeln!(out, "  {}", line);
    }
    let _ = writeln!(
        out,
        "{:<8} {:<10} {:>11} {:>11} {:>9} {:>13}",
        "Cell ID", "Type", "Voltage (V)", "Current (A)", "Temp (°C)", "Capacity (Wh)"
    );
    for reading in &result.snapshot {
        let _ = writeln!(
            out,
            "{:<8} {:<10} {:>11.2} {:>11.2} {:>9.1} {:>13.2}",
            reading.cell.label(),
            reading.cell.cell_type.export_label(),
            reading.voltage,
            reading.current,
            reading.temperature,
            reading.capacity
        );
    }
    out
}

/// One line per point of `metric`, grouped by mode.
pub fn render_series(result: &PerformanceResult, metric: Metric) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} over time", metric);
    for (time_index, mode, value) in result.metric_series(metric) {
        let _ = writeln!(out, "  {:<12} t={:<3} {:.3}", mode.to_string(), time_index, value);
    }
    out
}
