//! Control Panel Widget
//! Left side panel with the dataset picker and per-chart filter controls.

use egui::{Color32, ComboBox, DragValue, RichText};
use std::path::PathBuf;

use crate::charts::ChartSlot;
use crate::data::RecordTable;

/// Delimiter used when a category cell holds a tag list ("Action, Drama").
pub const TAG_DELIMITER: char = ',';

/// Current values of every filter control, read synchronously at render time.
#[derive(Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,

    // Category charts
    pub tag_field: String,
    pub top_n: usize,
    pub pie_field: String,

    // Range-filtered charts share the bound field, with separate bounds.
    pub range_field: String,
    pub line_from: i64,
    pub line_to: i64,
    pub hist_field: String,
    pub hist_from: i64,
    pub hist_to: i64,
    pub hist_bins: usize,

    // Scatter
    pub scatter_x: String,
    pub scatter_y: String,
    pub scatter_y_currency: bool,
    pub scatter_label: String,

    // Group average
    pub group_field: String,
    pub value_field: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            csv_path: None,
            tag_field: String::new(),
            top_n: 10,
            pie_field: String::new(),
            range_field: String::new(),
            line_from: 1980,
            line_to: 2020,
            hist_field: String::new(),
            hist_from: 1980,
            hist_to: 2020,
            hist_bins: 20,
            scatter_x: String::new(),
            scatter_y: String::new(),
            scatter_y_currency: false,
            scatter_label: String::new(),
            group_field: String::new(),
            value_field: String::new(),
        }
    }
}

impl UserSettings {
    /// Guess default field roles from header names; every guess stays
    /// overridable from the panel. The movie dataset maps fully; any other
    /// CSV falls back to its first text/numeric columns.
    pub fn guess_fields(&mut self, table: &RecordTable) {
        let first_text = table
            .headers
            .iter()
            .find(|h| !table.numeric_headers.contains(h))
            .cloned()
            .unwrap_or_default();
        let first_numeric = table.numeric_headers.first().cloned().unwrap_or_default();
        let second_numeric = table.numeric_headers.get(1).cloned();

        self.tag_field = table.find_header("genre").unwrap_or_else(|| first_text.clone());
        self.range_field = table
            .find_header("year")
            .unwrap_or_else(|| first_numeric.clone());
        self.hist_field = table
            .find_header("rating")
            .unwrap_or_else(|| first_numeric.clone());
        self.scatter_x = self.hist_field.clone();
        match table.find_header("gross") {
            Some(gross) => {
                self.scatter_y = gross;
                self.scatter_y_currency = true;
            }
            None => {
                self.scatter_y = second_numeric.unwrap_or_else(|| first_numeric.clone());
                self.scatter_y_currency = false;
            }
        }
        self.scatter_label = table
            .find_header("title")
            .unwrap_or_else(|| first_text.clone());
        self.pie_field = table
            .find_header("success")
            .unwrap_or_else(|| self.tag_field.clone());
        self.group_field = self.range_field.clone();
        self.value_field = self.hist_field.clone();
    }
}

/// Left side control panel with file selection and chart filters.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub progress: f32,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            columns: Vec::new(),
            numeric_columns: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take over the columns of a freshly loaded table and re-guess field
    /// roles.
    pub fn apply_table(&mut self, table: &RecordTable) {
        self.columns = table.headers.clone();
        self.numeric_columns = table.numeric_headers.clone();
        self.settings.guess_fields(table);
    }

    /// Draw the control panel and report the action it triggered.
    pub fn show(&mut self, ui: &mut egui::Ui, export_enabled: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Vizdeck")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("CSV Dashboard").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        let has_data = !self.columns.is_empty();
        if !has_data {
            ui.add_space(10.0);
            ui.label(RichText::new("Load a CSV to configure charts.").color(Color32::GRAY));
            self.show_progress(ui);
            return action;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Categories =====
        ui.label(RichText::new("🏷 Categories").size(14.0).strong());
        ui.add_space(8.0);

        let columns = self.columns.clone();
        let numeric = self.numeric_columns.clone();

        if Self::field_combo(ui, "tag_field", "Tag Column:", &mut self.settings.tag_field, &columns)
        {
            action = ControlPanelAction::Rebuild(ChartSlot::CategoryBar);
        }
        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new("Top N:"));
            if ui
                .add(DragValue::new(&mut self.settings.top_n).range(1..=30))
                .changed()
            {
                action = ControlPanelAction::Rebuild(ChartSlot::CategoryBar);
            }
        });
        if Self::field_combo(ui, "pie_field", "Pie Column:", &mut self.settings.pie_field, &columns)
        {
            action = ControlPanelAction::Rebuild(ChartSlot::CategoryPie);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Range filters =====
        ui.label(RichText::new("📆 Range Filters").size(14.0).strong());
        ui.add_space(8.0);

        if Self::field_combo(
            ui,
            "range_field",
            "Bound Column:",
            &mut self.settings.range_field,
            &numeric,
        ) {
            action = ControlPanelAction::RangeFieldChanged;
        }

        let mut line_range_changed = false;
        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new("Line Range:"));
            line_range_changed |= ui.add(DragValue::new(&mut self.settings.line_from)).changed();
            ui.label("to");
            line_range_changed |= ui.add(DragValue::new(&mut self.settings.line_to)).changed();
        });
        // Inverted bounds suppress the rebuild until corrected.
        if line_range_changed && self.settings.line_from <= self.settings.line_to {
            action = ControlPanelAction::Rebuild(ChartSlot::CountsLine);
        }

        ui.add_space(5.0);

        if Self::field_combo(
            ui,
            "hist_field",
            "Histogram Column:",
            &mut self.settings.hist_field,
            &numeric,
        ) {
            action = ControlPanelAction::Rebuild(ChartSlot::Histogram);
        }

        let mut hist_changed = false;
        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new("Hist Range:"));
            hist_changed |= ui.add(DragValue::new(&mut self.settings.hist_from)).changed();
            ui.label("to");
            hist_changed |= ui.add(DragValue::new(&mut self.settings.hist_to)).changed();
        });
        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new("Bins:"));
            hist_changed |= ui
                .add(DragValue::new(&mut self.settings.hist_bins).range(5..=60))
                .changed();
        });
        if hist_changed && self.settings.hist_from <= self.settings.hist_to {
            action = ControlPanelAction::Rebuild(ChartSlot::Histogram);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Scatter =====
        ui.label(RichText::new("🎯 Scatter").size(14.0).strong());
        ui.add_space(8.0);

        let mut scatter_changed = false;
        scatter_changed |=
            Self::field_combo(ui, "scatter_x", "X Column:", &mut self.settings.scatter_x, &numeric);
        scatter_changed |=
            Self::field_combo(ui, "scatter_y", "Y Column:", &mut self.settings.scatter_y, &columns);
        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new("Currency Y:"));
            scatter_changed |= ui
                .checkbox(&mut self.settings.scatter_y_currency, "")
                .changed();
        });
        scatter_changed |= Self::field_combo(
            ui,
            "scatter_label",
            "Label Column:",
            &mut self.settings.scatter_label,
            &columns,
        );
        if scatter_changed {
            action = ControlPanelAction::Rebuild(ChartSlot::Scatter);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Group average =====
        ui.label(RichText::new("📈 Averages").size(14.0).strong());
        ui.add_space(8.0);

        let mut avg_changed = false;
        avg_changed |= Self::field_combo(
            ui,
            "group_field",
            "Group Column:",
            &mut self.settings.group_field,
            &columns,
        );
        avg_changed |= Self::field_combo(
            ui,
            "value_field",
            "Value Column:",
            &mut self.settings.value_field,
            &numeric,
        );
        if avg_changed {
            action = ControlPanelAction::Rebuild(ChartSlot::AverageLine);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Actions =====
        ui.vertical_centered(|ui| {
            let refresh = egui::Button::new(RichText::new("↻ Refresh All").size(16.0))
                .min_size(egui::vec2(200.0, 35.0));
            if ui.add(refresh).clicked() {
                action = ControlPanelAction::RebuildAll;
            }

            ui.add_space(8.0);

            ui.add_enabled_ui(export_enabled, |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(35.0);
                    if ui
                        .add(egui::Button::new(RichText::new("🖼 Export PNG").size(13.0)))
                        .clicked()
                    {
                        action = ControlPanelAction::ExportPng;
                    }
                    if ui
                        .add(egui::Button::new(RichText::new("📄 Export JSON").size(13.0)))
                        .clicked()
                    {
                        action = ControlPanelAction::ExportJson;
                    }
                });
            });
        });

        self.show_progress(ui);
        action
    }

    fn show_progress(&mut self, ui: &mut egui::Ui) {
        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("ready") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));
    }

    /// Labelled ComboBox over the given column names; true when the
    /// selection changed.
    fn field_combo(
        ui: &mut egui::Ui,
        id: &str,
        label: &str,
        current: &mut String,
        options: &[String],
    ) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new(label));
            ComboBox::from_id_salt(id)
                .width(150.0)
                .selected_text(current.as_str())
                .show_ui(ui, |ui| {
                    for col in options {
                        if ui.selectable_label(*current == *col, col).clicked() && *current != *col
                        {
                            *current = col.clone();
                            changed = true;
                        }
                    }
                });
        });
        ui.add_space(5.0);
        changed
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    /// A control feeding a single chart changed.
    Rebuild(ChartSlot),
    /// The shared bound column changed; both range-filtered charts rebuild.
    RangeFieldChanged,
    RebuildAll,
    ExportPng,
    ExportJson,
}
