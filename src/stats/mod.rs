//! Stats module - descriptive statistics and aggregations

mod calculator;
pub mod grouping;

pub use calculator::{BoxSummary, ColumnSummary, CorrelationMatrix, StatsCalculator};
pub use grouping::GroupMean;
