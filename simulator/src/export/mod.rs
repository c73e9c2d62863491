pub mod delimited;
pub mod summary;

pub use delimited::{open_output, write_series, write_snapshot};
pub use summary::{render_dashboard, render_series};
