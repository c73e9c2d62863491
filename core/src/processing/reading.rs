use crate::cell::{CellSpec, CellType, OperatingMode, Reading};
use crate::math::StatsHelper;
use rand::Rng;

const TEMPERATURE_RANGE: (f64, f64) = (25.0, 40.0);

/// Voltage window `(low, high)` around the chemistry's base voltage for a mode.
pub fn voltage_window(cell_type: CellType, mode: OperatingMode) -> (f64, f64) {
    let base = cell_type.base_voltage();
    match mode {
        OperatingMode::Charging => (base + 0.1, base + 0.5),
        OperatingMode::Discharging => (base - 0.5, base - 0.1),
        OperatingMode::Idle => (base - 0.05, base + 0.05),
    }
}

/// Current window for a mode; `None` when the cell carries no current.
pub fn current_window(mode: OperatingMode) -> Option<(f64, f64)> {
    match mode {
        OperatingMode::Charging => Some((1.0, 5.0)),
        OperatingMode::Discharging => Some((0.5, 3.0)),
        OperatingMode::Idle => None,
    }
}

/// Draws one reading for a chemistry under `mode`, tagged as cell 1.
pub fn generate_reading<R: Rng + ?Sized>(
    rng: &mut R,
    cell_type: CellType,
    mode: OperatingMode,
) -> Reading {
    generate_cell_reading(rng, CellSpec::new(1, cell_type), mode)
}

/// Draws one reading for `cell`.
///
/// Voltage and current are rounded to two places before the capacity is
/// derived from them, so `capacity == round(voltage * current, 2)` holds on
/// the returned values.
pub fn generate_cell_reading<R: Rng + ?Sized>(
    rng: &mut R,
    cell: CellSpec,
    mode: OperatingMode,
) -> Reading {
    let (v_low, v_high) = voltage_window(cell.cell_type, mode);
    let voltage = StatsHelper::round_to(rng.gen_range(v_low..=v_high), 2);
    let current = match current_window(mode) {
        Some((i_low, i_high)) => StatsHelper::round_to(rng.gen_range(i_low..=i_high), 2),
        None => 0.0,
    };
    let temperature =
        StatsHelper::round_to(rng.gen_range(TEMPERATURE_RANGE.0..=TEMPERATURE_RANGE.1), 1);
    let capacity = StatsHelper::round_to(voltage * current, 2);

    Reading {
        cell,
        mode,
        voltage,
        current,
        temperature,
        capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const EPS: f64 = 1e-9;

    fn within(value: f64, (low, high): (f64, f64)) -> bool {
        value >= low - EPS && value <= high + EPS
    }

    #[test]
    fn readings_stay_inside_mode_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for cell_type in CellType::ALL {
            for mode in OperatingMode::ALL {
                for _ in 0..200 {
                    let reading = generate_reading(&mut rng, cell_type, mode);
                    assert!(within(reading.voltage, voltage_window(cell_type, mode)));
                    match current_window(mode) {
                        Some(window) => assert!(within(reading.current, window)),
                        None => assert_eq!(reading.current, 0.0),
                    }
                    assert!(within(reading.temperature, TEMPERATURE_RANGE));
                    assert_eq!(
                        reading.capacity,
                        StatsHelper::round_to(reading.voltage * reading.current, 2)
                    );
                }
            }
        }
    }

    #[test]
    fn lfp_idle_reading_has_no_capacity() {
        let mut rng = StdRng::seed_from_u64(11);
        let reading = generate_reading(&mut rng, "lfp".parse().unwrap(), OperatingMode::Idle);
        assert!(within(reading.voltage, (3.15, 3.25)));
        assert_eq!(reading.current, 0.0);
        assert!(within(reading.temperature, (25.0, 40.0)));
        assert_eq!(reading.capacity, 0.0);
    }

    #[test]
    fn readings_are_rounded() {
        let mut rng = StdRng::seed_from_u64(3);
        let reading = generate_reading(&mut rng, CellType::Nca, OperatingMode::Charging);
        assert_eq!(reading.voltage, StatsHelper::round_to(reading.voltage, 2));
        assert_eq!(reading.current, StatsHelper::round_to(reading.current, 2));
        assert_eq!(reading.temperature, StatsHelper::round_to(reading.temperature, 1));
    }

    #[test]
    fn same_seed_gives_same_reading() {
        let mut first = StdRng::seed_from_u64(42);
        let mut second = StdRng::seed_from_u64(42);
        assert_eq!(
            generate_reading(&mut first, CellType::Lmo, OperatingMode::Discharging),
            generate_reading(&mut second, CellType::Lmo, OperatingMode::Discharging)
        );
    }
}
