pub mod chemistry;
pub mod reading;

pub use chemistry::{CellType, OperatingMode};
pub use reading::{AggregateRecord, CellSpec, FleetSnapshot, Reading, SeriesRecord};
