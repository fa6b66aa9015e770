pub mod result_table;
pub mod summary;
pub mod timeseries;

pub use result_table::{MarginUnit, ResultRow, ResultTable};
pub use summary::RunSummary;
pub use timeseries::{calculate_equity_curve, EquityPoint};
