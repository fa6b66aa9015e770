pub mod loader;
pub mod observation;

pub use loader::{load_csv, parse_date};
pub use observation::{Observation, PriceSeries, SeriesError};
