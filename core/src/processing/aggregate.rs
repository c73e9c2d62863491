use crate::cell::{AggregateRecord, FleetSnapshot, Reading};
use crate::math::StatsHelper;
use crate::prelude::{SimError, SimResult};

/// Means of voltage, current and temperature plus the summed capacity.
///
/// An empty snapshot has no mean; callers are expected to reject empty
/// selections before generating.
pub fn aggregate(snapshot: &FleetSnapshot) -> SimResult<AggregateRecord> {
    let avg_voltage = mean_of(snapshot, |r| r.voltage)?;
    let avg_current = mean_of(snapshot, |r| r.current)?;
    let avg_temperature = mean_of(snapshot, |r| r.temperature)?;
    let total_capacity = snapshot.iter().map(|r| r.capacity).sum();

    Ok(AggregateRecord {
        avg_voltage,
        avg_current,
        avg_temperature,
        total_capacity,
    })
}

fn mean_of(snapshot: &FleetSnapshot, field: impl Fn(&Reading) -> f64) -> SimResult<f64> {
    let values = snapshot.iter().map(field).collect::<Vec<_>>();
    StatsHelper::mean(&values).ok_or(SimError::EmptySnapshot)
}
