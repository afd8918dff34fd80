//! Main application window.
//! Wires the control panel to the chart viewer: CSV loads and full recomputes
//! run on worker threads reporting over channels; single-control changes
//! rebuild just the affected chart inside the UI event.

use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::Context as _;
use egui::SidePanel;
use rayon::prelude::*;

use crate::agg::Aggregator;
use crate::charts::{caption, ChartData, ChartPlot, ChartSlot, StaticChartRenderer};
use crate::data::{self, RecordTable};
use crate::gui::control_panel::{UserSettings, TAG_DELIMITER};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};

/// CSV loading result from the background thread
enum LoadResult {
    Progress(String),
    Complete(RecordTable),
    Error(String),
}

/// Full-recompute result from the background thread
enum CalcResult {
    Progress(f32, String),
    Complete(Vec<ChartData>),
}

/// Main application window.
pub struct DashboardApp {
    table: Option<Arc<RecordTable>>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    // Async chart recompute
    calc_rx: Option<Receiver<CalcResult>>,
    is_calculating: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            table: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
            calc_rx: None,
            is_calculating: false,
        }
    }

    /// Handle CSV file selection; parsing runs off the UI thread.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.chart_viewer.clear();
            self.control_panel.settings.csv_path = Some(path.clone());
            self.control_panel.set_progress(0.0, "Loading CSV file...");
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            thread::spawn(move || {
                let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));
                match data::load_csv(&path) {
                    Ok(table) => {
                        let _ = tx.send(LoadResult::Complete(table));
                    }
                    Err(e) => {
                        let _ = tx.send(LoadResult::Error(e.to_string()));
                    }
                }
            });
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(0.0, &status);
                    }
                    LoadResult::Complete(table) => {
                        log::info!(
                            "loaded {} rows, {} columns",
                            table.len(),
                            table.headers.len()
                        );
                        if table.is_empty() {
                            log::warn!("dataset has headers but no rows");
                        }
                        self.control_panel.apply_table(&table);
                        self.control_panel.set_progress(
                            0.0,
                            &format!("Loaded {} rows, {} columns", table.len(), table.headers.len()),
                        );
                        self.table = Some(Arc::new(table));
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.start_full_recompute();
                    }
                    LoadResult::Error(error) => {
                        log::error!("CSV load failed: {error}");
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {error}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Recompute every chart on a worker thread.
    fn start_full_recompute(&mut self) {
        let Some(table) = self.table.clone() else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };
        if self.is_calculating {
            return;
        }

        let settings = self.control_panel.settings.clone();
        let (tx, rx) = channel();
        self.calc_rx = Some(rx);
        self.is_calculating = true;
        self.control_panel.set_progress(5.0, "Aggregating records...");

        thread::spawn(move || {
            Self::run_recompute(tx, table, settings);
        });
    }

    /// Run the full recompute (called from the worker thread).
    fn run_recompute(tx: Sender<CalcResult>, table: Arc<RecordTable>, settings: UserSettings) {
        let _ = tx.send(CalcResult::Progress(
            20.0,
            "Aggregating records...".to_string(),
        ));

        let charts: Vec<ChartData> = ChartSlot::all()
            .par_iter()
            .map(|slot| Self::build_chart(*slot, &table, &settings))
            .collect();

        let _ = tx.send(CalcResult::Progress(90.0, "Preparing charts...".to_string()));
        let _ = tx.send(CalcResult::Complete(charts));
    }

    /// Check for recompute results
    fn check_calculation_results(&mut self) {
        let rx = self.calc_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    CalcResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    CalcResult::Complete(charts) => {
                        let count = charts.len();
                        self.chart_viewer.set_charts(charts);
                        self.chart_viewer.insight =
                            caption::insight(self.table.as_ref().map_or(0, |t| t.len()));
                        self.control_panel
                            .set_progress(100.0, &format!("{count} charts ready"));
                        self.is_calculating = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.calc_rx = Some(rx);
            }
        }
    }

    /// Rebuild one chart synchronously after its controls changed.
    fn rebuild_chart(&mut self, slot: ChartSlot) {
        let Some(table) = &self.table else {
            return;
        };
        let data = Self::build_chart(slot, table, &self.control_panel.settings);
        self.chart_viewer.set_chart(data);
    }

    /// Aggregate one slot and shape the result for the renderers.
    fn build_chart(slot: ChartSlot, table: &RecordTable, s: &UserSettings) -> ChartData {
        let records = table.records();
        match slot {
            ChartSlot::CategoryBar => {
                let series = Aggregator::category_frequency(
                    records,
                    &s.tag_field,
                    TAG_DELIMITER,
                    Some(s.top_n),
                );
                ChartData {
                    slot,
                    title: format!("Top {} {}", s.top_n, s.tag_field),
                    caption: caption::frequency(&series),
                    x_label: s.tag_field.clone(),
                    y_label: "Records".to_string(),
                    plot: ChartPlot::Bar(series),
                }
            }
            ChartSlot::CountsLine => {
                let series =
                    Aggregator::counts_by_value(records, &s.range_field, s.line_from, s.line_to);
                ChartData {
                    slot,
                    title: format!(
                        "Records per {} ({}-{})",
                        s.range_field, s.line_from, s.line_to
                    ),
                    caption: caption::counts(&series, &s.range_field),
                    x_label: s.range_field.clone(),
                    y_label: "Records".to_string(),
                    plot: ChartPlot::Line(series),
                }
            }
            ChartSlot::Histogram => {
                let series = Aggregator::histogram(
                    records,
                    &s.hist_field,
                    &s.range_field,
                    s.hist_from,
                    s.hist_to,
                    s.hist_bins,
                );
                ChartData {
                    slot,
                    title: format!(
                        "{} Distribution ({}-{})",
                        s.hist_field, s.hist_from, s.hist_to
                    ),
                    caption: caption::histogram(&series, &s.hist_field),
                    x_label: s.hist_field.clone(),
                    y_label: "Frequency".to_string(),
                    plot: ChartPlot::Histogram(series),
                }
            }
            ChartSlot::Scatter => {
                let series = Aggregator::scatter_pairs(
                    records,
                    &s.scatter_x,
                    &s.scatter_y,
                    &s.scatter_label,
                    s.scatter_y_currency,
                );
                ChartData {
                    slot,
                    title: format!("{} vs {}", s.scatter_x, s.scatter_y),
                    caption: caption::scatter(&series, &s.scatter_y),
                    x_label: s.scatter_x.clone(),
                    y_label: s.scatter_y.clone(),
                    plot: ChartPlot::Scatter(series),
                }
            }
            ChartSlot::CategoryPie => {
                let series =
                    Aggregator::category_proportions(records, &s.pie_field, TAG_DELIMITER);
                ChartData {
                    slot,
                    title: format!("{} Share", s.pie_field),
                    caption: caption::proportions(&series),
                    x_label: String::new(),
                    y_label: String::new(),
                    plot: ChartPlot::Pie(series),
                }
            }
            ChartSlot::AverageLine => {
                let series = Aggregator::group_average(records, &s.group_field, &s.value_field);
                ChartData {
                    slot,
                    title: format!("Average {} per {}", s.value_field, s.group_field),
                    caption: caption::averages(&series, &s.group_field, &s.value_field),
                    x_label: s.group_field.clone(),
                    y_label: format!("Average {}", s.value_field),
                    plot: ChartPlot::Line(series),
                }
            }
        }
    }

    /// Render every chart card to a PNG file in a user-chosen directory.
    fn handle_export_png(&mut self) {
        if self.chart_viewer.is_empty() {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        }

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        let charts: Vec<ChartData> = self
            .chart_viewer
            .ordered_charts()
            .into_iter()
            .cloned()
            .collect();
        let total = charts.len();

        for (idx, data) in charts.iter().enumerate() {
            let progress = 10.0 + (idx as f32 / total as f32) * 80.0;
            self.control_panel
                .set_progress(progress, &format!("Rendering chart {}/{total}...", idx + 1));

            let png = match StaticChartRenderer::render_chart_to_bytes(data, 1200, 800) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::error!("render failed for {}: {e}", data.slot.id());
                    self.control_panel
                        .set_progress(0.0, &format!("Error: {e}"));
                    return;
                }
            };

            let path = dir.join(format!("{}.png", data.slot.id()));
            if let Err(e) = std::fs::write(&path, png) {
                log::error!("write failed for {}: {e}", path.display());
                self.control_panel.set_progress(0.0, &format!("Error: {e}"));
                return;
            }
        }

        log::info!("exported {total} charts to {}", dir.display());
        self.control_panel
            .set_progress(100.0, &format!("{total} PNG files exported"));
    }

    /// Serialize the current aggregates to a JSON file.
    fn handle_export_json(&mut self) {
        if self.chart_viewer.is_empty() {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("aggregates.json")
            .save_file()
        else {
            return;
        };

        match self.export_json(&path) {
            Ok(count) => {
                log::info!("exported {count} aggregates to {}", path.display());
                self.control_panel
                    .set_progress(100.0, &format!("{count} aggregates exported"));
            }
            Err(e) => {
                log::error!("JSON export failed: {e:#}");
                self.control_panel.set_progress(0.0, &format!("Error: {e}"));
            }
        }
    }

    fn export_json(&self, path: &Path) -> anyhow::Result<usize> {
        let charts = self.chart_viewer.ordered_charts();
        let doc = serde_json::json!({
            "insight": self.chart_viewer.insight,
            "charts": charts,
        });
        let bytes = serde_json::to_vec_pretty(&doc).context("serializing aggregates")?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(charts.len())
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_calculation_results();

        // Request repaint while loading or calculating
        if self.is_loading || self.is_calculating {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let export_enabled = !self.chart_viewer.is_empty();
                    let action = self.control_panel.show(ui, export_enabled);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Rebuild(slot) => self.rebuild_chart(slot),
                        ControlPanelAction::RangeFieldChanged => {
                            self.rebuild_chart(ChartSlot::CountsLine);
                            self.rebuild_chart(ChartSlot::Histogram);
                        }
                        ControlPanelAction::RebuildAll => {
                            if !self.is_calculating {
                                self.start_full_recompute();
                            }
                        }
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
