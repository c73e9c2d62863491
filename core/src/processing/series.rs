use crate::cell::{CellType, OperatingMode, SeriesRecord};
use crate::processing::{aggregate::aggregate, fleet::generate_fleet};
use crate::prelude::{SimError, SimResult};
use crate::telemetry::log::LogManager;
use rand::Rng;

/// Samples `steps_per_mode` independent fleet aggregates for each mode.
///
/// Records come out grouped by mode in input order, with time indices
/// `0..steps_per_mode` inside each group. Steps are independent draws.
/// A record count that does not fit in `usize` is rejected up front;
/// bounding the amount of work is left to the caller.
pub fn sample_series<R: Rng + ?Sized>(
    rng: &mut R,
    modes: &[OperatingMode],
    steps_per_mode: usize,
    selection: &[CellType],
) -> SimResult<Vec<SeriesRecord>> {
    let logger = LogManager::new();
    let total = modes.len().checked_mul(steps_per_mode).ok_or_else(|| {
        SimError::InvalidConfig(format!(
            "{} modes x {} steps overflows the series length",
            modes.len(),
            steps_per_mode
        ))
    })?;
    let mut records = Vec::new();

    for &mode in modes {
        for time_index in 0..steps_per_mode {
            let snapshot = generate_fleet(rng, selection, mode);
            records.push(SeriesRecord {
                time_index,
                mode,
                aggregate: aggregate(&snapshot)?,
            });
        }
    }

    logger.detail(&format!(
        "sampled {}/{} series records over {} modes for {} cells",
        records.len(),
        total,
        modes.len(),
        selection.len()
    ));
    Ok(records)
}
