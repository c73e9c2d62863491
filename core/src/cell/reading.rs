use crate::cell::chemistry::{CellType, OperatingMode};
use serde::{Deserialize, Serialize};

/// One simulated cell: its 1-based position in the selection and its chemistry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellSpec {
    pub index: usize,
    pub cell_type: CellType,
}

impl CellSpec {
    pub fn new(index: usize, cell_type: CellType) -> Self {
        Self { index, cell_type }
    }

    pub fn label(&self) -> String {
        format!("Cell_{}", self.index)
    }
}

/// Single synthetic measurement of a cell under an operating mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    pub cell: CellSpec,
    pub mode: OperatingMode,
    pub voltage: f64,
    pub current: f64,
    pub temperature: f64,
    pub capacity: f64,
}

/// Readings for one generation call, in selection order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FleetSnapshot {
    readings: Vec<Reading>,
}

impl FleetSnapshot {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    pub fn into_readings(self) -> Vec<Reading> {
        self.readings
    }
}

impl<'a> IntoIterator for &'a FleetSnapshot {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

/// Summary statistics over a fleet snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AggregateRecord {
    pub avg_voltage: f64,
    pub avg_current: f64,
    pub avg_temperature: f64,
    pub total_capacity: f64,
}

/// Aggregate tagged with the step and mode it was sampled under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeriesRecord {
    pub time_index: usize,
    pub mode: OperatingMode,
    pub aggregate: AggregateRecord,
}
