pub mod aggregate;
pub mod fleet;
pub mod reading;
pub mod series;

pub use aggregate::aggregate;
pub use fleet::generate_fleet;
pub use reading::{generate_cell_reading, generate_reading};
pub use series::sample_series;
