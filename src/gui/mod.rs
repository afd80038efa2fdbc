//! GUI module - native chart window

mod app;
mod chart_viewer;

pub use app::{run_viewer, ListingsViewer};
pub use chart_viewer::{ChartView, ChartViewer};
