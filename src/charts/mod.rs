//! Charts module - Chart data and rendering

mod chart_set;
pub mod colormap;
mod plotter;
mod renderer;

pub use chart_set::{ChartSet, PriceBand};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
