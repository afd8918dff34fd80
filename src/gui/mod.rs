//! GUI module - User interface components

mod app;
mod chart_viewer;
pub mod control_panel;

pub use app::DashboardApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
