//! Chart Viewer Widget
//! Scrollable panel displaying the chart cards in a responsive multi-column
//! grid, each card pairing an interactive plot with its caption.

use crate::charts::{ChartData, ChartPlotter, ChartSlot};
use egui::{Color32, RichText, ScrollArea};
use std::collections::HashMap;

const CHART_SPACING: f32 = 15.0;
const CARD_HEIGHT: f32 = 360.0;
const CHART_WIDTH: f32 = 560.0;
const PLOT_HEIGHT: f32 = 260.0;

/// Scrollable chart display area. Cards keep the fixed slot order and wrap
/// into as many columns as the available width allows.
#[derive(Default)]
pub struct ChartViewer {
    charts: HashMap<ChartSlot, ChartData>,
    /// Dataset-level one-liner shown above the cards.
    pub insight: String,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.charts.clear();
        self.insight.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Replace one chart card; the previous card for the slot is discarded.
    pub fn set_chart(&mut self, data: ChartData) {
        self.charts.insert(data.slot, data);
    }

    /// Replace the whole card set after a full recompute.
    pub fn set_charts(&mut self, charts: Vec<ChartData>) {
        self.charts = charts.into_iter().map(|c| (c.slot, c)).collect();
    }

    /// Chart cards in slot order, for export.
    pub fn ordered_charts(&self) -> Vec<&ChartData> {
        ChartSlot::all()
            .iter()
            .filter_map(|slot| self.charts.get(slot))
            .collect()
    }

    /// Draw the viewer with a responsive multi-column layout.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.charts.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        if !self.insight.is_empty() {
            ui.label(RichText::new(&self.insight).size(13.0).color(Color32::GRAY));
            ui.add_space(8.0);
        }

        let order: Vec<ChartSlot> = ChartSlot::all()
            .into_iter()
            .filter(|slot| self.charts.contains_key(slot))
            .collect();

        let avail_width = ui.available_width();
        let card_total_width = CHART_WIDTH + CHART_SPACING;
        let num_columns = ((avail_width / card_total_width).floor() as usize).max(1);

        let total_items = order.len();
        let total_rows = total_items.div_ceil(num_columns);
        let row_height = CARD_HEIGHT + CHART_SPACING;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_rows(ui, row_height, total_rows, |ui, row_range| {
                for row in row_range {
                    ui.horizontal(|ui| {
                        for col in 0..num_columns {
                            let idx = row * num_columns + col;
                            if idx < total_items {
                                if let Some(data) = self.charts.get(&order[idx]) {
                                    Self::draw_chart_card(ui, data);
                                }
                                ui.add_space(CHART_SPACING);
                            }
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    fn draw_chart_card(ui: &mut egui::Ui, data: &ChartData) {
        let card_width = CHART_WIDTH - 20.0;

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(70)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(card_width);

                ui.vertical(|ui| {
                    ui.label(RichText::new(&data.title).size(16.0).strong());
                    ui.add_space(6.0);

                    ChartPlotter::draw(ui, data, PLOT_HEIGHT);

                    ui.add_space(6.0);
                    ui.label(
                        RichText::new(&data.caption)
                            .size(12.0)
                            .color(Color32::GRAY),
                    );
                });
            });
    }
}
