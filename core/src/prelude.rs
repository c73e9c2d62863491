pub use crate::cell::{
    AggregateRecord, CellSpec, CellType, FleetSnapshot, OperatingMode, Reading, SeriesRecord,
};
pub use crate::processing::{
    aggregate, generate_cell_reading, generate_fleet, generate_reading, sample_series,
};
pub use crate::selection::{dedupe_selection, parse_selection};

/// Common error type for generation and aggregation calls.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("unknown cell type: {0}")]
    UnknownCellType(String),
    #[error("unknown operating mode: {0}")]
    UnknownMode(String),
    #[error("at least one cell type must be selected")]
    InvalidSelection,
    #[error("cannot aggregate an empty fleet snapshot")]
    EmptySnapshot,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SimResult<T> = Result<T, SimError>;
