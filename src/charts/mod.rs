//! Charts module - chart payloads, captions, and both render backends

pub mod caption;
mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartPlot, ChartPlotter, ChartSlot};
pub use renderer::{ExportError, StaticChartRenderer};
