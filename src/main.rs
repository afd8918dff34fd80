//! Vizdeck - CSV Dataset Explorer & Interactive Chart Dashboard
//!
//! Loads tabular CSV datasets and renders live bar, line, pie, histogram and
//! scatter charts driven by filter controls.

mod agg;
mod charts;
mod data;
mod gui;

use eframe::egui;
use gui::DashboardApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Vizdeck"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Vizdeck",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
    )
}
