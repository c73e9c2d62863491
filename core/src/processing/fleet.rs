use crate::cell::{CellSpec, CellType, FleetSnapshot, OperatingMode};
use crate::processing::reading::generate_cell_reading;
use rand::Rng;

/// Generates one reading per selected cell, numbering cells from 1 in input order.
pub fn generate_fleet<R: Rng + ?Sized>(
    rng: &mut R,
    selection: &[CellType],
    mode: OperatingMode,
) -> FleetSnapshot {
    let readings = selection
        .iter()
        .enumerate()
        .map(|(offset, &cell_type)| {
            generate_cell_reading(&mut *rng, CellSpec::new(offset + 1, cell_type), mode)
        })
        .collect::<Vec<_>>();
    log::debug!("generated {} {} readings", readings.len(), mode);
    FleetSnapshot::new(readings)
}
