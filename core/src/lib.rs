//! Synthetic telemetry core for the battery cell simulator.
//!
//! Everything here is stateless: callers supply the random source and the
//! cell selection, and get back readings, fleet snapshots, aggregates and
//! time-series records. Scheduling and presentation live in the simulator.

pub mod cell;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod selection;
pub mod telemetry;

pub use prelude::{SimError, SimResult};
