//! Comma-separated export of fleet snapshots and performance series.
//!
//! Header names are fixed and numbers are written the way the dashboard's
//! earlier exports wrote them: the shortest text that reads back to the same
//! value, always with a fractional part (`3.2`, `0.0`, `31.25`).
//! Downstream spreadsheets key on both.

use anyhow::Context;
use cellcore::prelude::{FleetSnapshot, SeriesRecord};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_NAME: &str = "battery_cell_data.csv";

const SNAPSHOT_HEADER: [&str; 7] = [
    "Cell ID",
    "Type",
    "Mode",
    "Voltage (V)",
    "Current (A)",
    "Temp (°C)",
    "Capacity (Wh)",
];

const SERIES_HEADER: [&str; 6] = [
    "Time",
    "Mode",
    "Avg Voltage",
    "Avg Current",
    "Avg Temp",
    "Total Capacity",
];

/// Shortest round-trip text for `value`, keeping a trailing `.0` on whole numbers.
pub fn float_text(value: f64) -> String {
    format!("{:?}", value)
}

/// Directories get the default export file name appended.
pub fn resolve_export_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DEFAULT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Opens `path` for writing; `-` means stdout.
pub fn open_output(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdout()));
    }
    let resolved = resolve_export_path(path);
    let path = resolved.as_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating export directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    Ok(Box::new(file))
}

/// Writes one row per reading. The `Mode` column is only emitted when
/// `include_mode` is set.
pub fn write_snapshot<W: Write>(
    writer: W,
    snapshot: &FleetSnapshot,
    include_mode: bool,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let header = SNAPSHOT_HEADER
        .iter()
        .filter(|column| include_mode || **column != "Mode");
    writer.write_record(header)?;

    for reading in snapshot {
        let mut row = vec![reading.cell.label(), reading.cell.cell_type.export_label()];
        if include_mode {
            row.push(reading.mode.to_string());
        }
        row.push(float_text(reading.voltage));
        row.push(float_text(reading.current));
        row.push(float_text(reading.temperature));
        row.push(float_text(reading.capacity));
        writer.write_record(&row)?;
    }
    writer.flush().context("flushing snapshot export")?;
    Ok(())
}

/// Writes one row per series record; aggregate values are not rounded.
pub fn write_series<W: Write>(writer: W, records: &[SeriesRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(SERIES_HEADER)?;

    for record in records {
        let aggregate = &record.aggregate;
        writer.write_record([
            record.time_index.to_string(),
            record.mode.to_string(),
            float_text(aggregate.avg_voltage),
            float_text(aggregate.avg_current),
            float_text(aggregate.avg_temperature),
            float_text(aggregate.total_capacity),
        ])?;
    }
    writer.flush().context("flushing series export")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellcore::prelude::{
        AggregateRecord, CellSpec, CellType, OperatingMode, Reading,
    };
    use std::fs;
    use tempfile::NamedTempFile;

    fn snapshot() -> FleetSnapshot {
        FleetSnapshot::new(vec![
            Reading {
                cell: CellSpec::new(1, CellType::Lfp),
                mode: OperatingMode::Charging,
                voltage: 3.5,
                current: 2.25,
                temperature: 30.0,
                capacity: 7.88,
            },
            Reading {
                cell: CellSpec::new(2, CellType::LeadAcid),
                mode: OperatingMode::Charging,
                voltage: 3.71,
                current: 1.0,
                temperature: 39.4,
                capacity: 3.71,
            },
        ])
    }

    #[test]
    fn snapshot_export_with_mode_column() {
        let mut buffer = Vec::new();
        write_snapshot(&mut buffer, &snapshot(), true).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "Cell ID,Type,Mode,Voltage (V),Current (A),Temp (°C),Capacity (Wh)\n\
             Cell_1,LFP,Charging,3.5,2.25,30.0,7.88\n\
             Cell_2,LEAD-ACID,Charging,3.71,1.0,39.4,3.71\n"
        );
    }

    #[test]
    fn snapshot_export_without_mode_column() {
        let mut buffer = Vec::new();
        write_snapshot(&mut buffer, &snapshot(), false).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Cell ID,Type,Voltage (V),Current (A),Temp (°C),Capacity (Wh)")
        );
        assert_eq!(lines.next(), Some("Cell_1,LFP,3.5,2.25,30.0,7.88"));
    }

    #[test]
    fn float_text_keeps_fractional_part() {
        assert_eq!(float_text(3.2), "3.2");
        assert_eq!(float_text(0.0), "0.0");
        assert_eq!(float_text(30.0), "30.0");
        assert_eq!(float_text(3.683333333333333), "3.683333333333333");
    }

    #[test]
    fn idle_snapshot_keeps_zero_current_as_decimal() {
        let idle = FleetSnapshot::new(vec![Reading {
            cell: CellSpec::new(1, CellType::Lfp),
            mode: OperatingMode::Idle,
            voltage: 3.2,
            current: 0.0,
            temperature: 30.0,
            capacity: 0.0,
        }]);
        let mut buffer = Vec::new();
        write_snapshot(&mut buffer, &idle, true).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().nth(1), Some("Cell_1,LFP,Idle,3.2,0.0,30.0,0.0"));
    }

    #[test]
    fn directory_exports_use_default_file_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_export_path(dir.path()),
            dir.path().join(DEFAULT_FILE_NAME)
        );
        let file = dir.path().join("fleet.csv");
        assert_eq!(resolve_export_path(&file), file);
    }

    #[test]
    fn series_export_writes_to_file() {
        let records = vec![SeriesRecord {
            time_index: 0,
            mode: OperatingMode::Idle,
            aggregate: AggregateRecord {
                avg_voltage: 3.5,
                avg_current: 0.0,
                avg_temperature: 31.25,
                total_capacity: 0.0,
            },
        }];
        let temp = NamedTempFile::new().unwrap();
        let path = temp.into_temp_path();
        let file = open_output(&path).unwrap();
        write_series(file, &records).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Time,Mode,Avg Voltage,Avg Current,Avg Temp,Total Capacity\n0,Idle,3.5,0.0,31.25,0.0\n"
        );
    }
}
