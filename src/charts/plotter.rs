//! Interactive chart rendering with egui_plot.

use egui::{Color32, Stroke, Vec2b};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon};
use serde::Serialize;

use crate::agg::{AggregateSeries, ScatterSeries};

/// Color palette for series and pie slices.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(121, 85, 72),   // Brown
];

/// The fixed chart slots of the dashboard. Each slot is rebuilt independently
/// when the controls that feed it change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartSlot {
    CategoryBar,
    CountsLine,
    Histogram,
    Scatter,
    CategoryPie,
    AverageLine,
}

impl ChartSlot {
    pub fn all() -> [ChartSlot; 6] {
        [
            ChartSlot::CategoryBar,
            ChartSlot::CountsLine,
            ChartSlot::Histogram,
            ChartSlot::Scatter,
            ChartSlot::CategoryPie,
            ChartSlot::AverageLine,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            ChartSlot::CategoryBar => "category_bar",
            ChartSlot::CountsLine => "counts_line",
            ChartSlot::Histogram => "histogram",
            ChartSlot::Scatter => "scatter",
            ChartSlot::CategoryPie => "category_pie",
            ChartSlot::AverageLine => "average_line",
        }
    }
}

/// The aggregate behind a chart, tagged with how to draw it.
#[derive(Debug, Clone, Serialize)]
pub enum ChartPlot {
    Bar(AggregateSeries),
    Line(AggregateSeries),
    Histogram(AggregateSeries),
    Pie(AggregateSeries),
    Scatter(ScatterSeries),
}

/// Everything one chart card needs: the aggregate, its caption, and labels.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub slot: ChartSlot,
    pub title: String,
    pub caption: String,
    pub x_label: String,
    pub y_label: String,
    pub plot: ChartPlot,
}

/// Creates interactive visualizations using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw a chart card body for the given data.
    pub fn draw(ui: &mut egui::Ui, data: &ChartData, height: f32) {
        match &data.plot {
            ChartPlot::Bar(series) | ChartPlot::Histogram(series) => {
                Self::draw_bar_chart(ui, data, series, height)
            }
            ChartPlot::Line(series) => Self::draw_line_chart(ui, data, series, height),
            ChartPlot::Pie(series) => Self::draw_pie_chart(ui, data, series, height),
            ChartPlot::Scatter(series) => Self::draw_scatter_chart(ui, data, series, height),
        }
    }

    /// Vertical bars at integer x positions with category labels on the axis.
    fn draw_bar_chart(ui: &mut egui::Ui, data: &ChartData, series: &AggregateSeries, height: f32) {
        let labels = series.labels.clone();
        let fill = match data.plot {
            ChartPlot::Histogram(_) => Self::color(1),
            _ => Self::color(0),
        };

        let bars: Vec<Bar> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| Bar::new(i as f64, v).width(0.6).fill(fill))
            .collect();

        Plot::new(data.slot.id())
            .height(height)
            .allow_scroll(false)
            .x_axis_label(&data.x_label)
            .y_axis_label(&data.y_label)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 0.25 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .y_axis_formatter(|mark, _range| format_compact(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Line with markers through integer x positions.
    fn draw_line_chart(ui: &mut egui::Ui, data: &ChartData, series: &AggregateSeries, height: f32) {
        let labels = series.labels.clone();
        let color = Self::color(2);
        let points: Vec<[f64; 2]> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, v])
            .collect();

        Plot::new(data.slot.id())
            .height(height)
            .allow_scroll(false)
            .x_axis_label(&data.x_label)
            .y_axis_label(&data.y_label)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 0.25 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .y_axis_formatter(|mark, _range| format_compact(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(3.0)
                        .color(color),
                );
            });
    }

    /// Scatter with a nearest-point hover label carrying the row's title.
    fn draw_scatter_chart(
        ui: &mut egui::Ui,
        data: &ChartData,
        series: &ScatterSeries,
        height: f32,
    ) {
        let color = Self::color(3);
        let points: Vec<[f64; 2]> = series
            .xs
            .iter()
            .zip(series.ys.iter())
            .map(|(&x, &y)| [x, y])
            .collect();

        let hover = series.clone();
        let x_name = data.x_label.clone();
        let y_name = data.y_label.clone();

        Plot::new(data.slot.id())
            .height(height)
            .allow_scroll(false)
            .x_axis_label(&data.x_label)
            .y_axis_label(&data.y_label)
            .y_axis_formatter(|mark, _range| format_compact(mark.value))
            .label_formatter(move |_name, value| match nearest_point(&hover, value) {
                Some(i) => {
                    let title = &hover.point_labels[i];
                    let header = if title.is_empty() {
                        String::new()
                    } else {
                        format!("{title}\n")
                    };
                    format!(
                        "{header}{x_name}: {}\n{y_name}: {}",
                        format_compact(hover.xs[i]),
                        format_compact(hover.ys[i]),
                    )
                }
                None => String::new(),
            })
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(2.5)
                        .color(color.gamma_multiply(0.8)),
                );
            });
    }

    /// Pie chart built from polygon wedges on a unit circle; shares are shown
    /// in the legend entries.
    fn draw_pie_chart(ui: &mut egui::Ui, data: &ChartData, series: &AggregateSeries, height: f32) {
        let total = series.total();
        if total <= 0.0 {
            ui.centered_and_justified(|ui| {
                ui.label("No data");
            });
            return;
        }

        Plot::new(data.slot.id())
            .height(height)
            .data_aspect(1.0)
            .show_axes(Vec2b::new(false, false))
            .show_grid(Vec2b::new(false, false))
            .show_x(false)
            .show_y(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                // Start at 12 o'clock and sweep clockwise.
                let mut angle = std::f64::consts::FRAC_PI_2;
                for (i, (label, value)) in series.iter().enumerate() {
                    if value <= 0.0 {
                        continue;
                    }
                    let sweep = value / total * std::f64::consts::TAU;
                    let steps = ((sweep / 0.05).ceil() as usize).max(2);

                    let mut outline = Vec::with_capacity(steps + 2);
                    outline.push([0.0, 0.0]);
                    for s in 0..=steps {
                        let a = angle - sweep * s as f64 / steps as f64;
                        outline.push([a.cos(), a.sin()]);
                    }
                    angle -= sweep;

                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(outline))
                            .fill_color(Self::color(i).gamma_multiply(0.9))
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(format!("{label} ({:.1}%)", value / total * 100.0)),
                    );
                }
            });
    }
}

/// Index of the series point closest to the cursor, normalized per axis so a
/// wide y domain (gross revenue) doesn't drown out x distance.
fn nearest_point(series: &ScatterSeries, cursor: &PlotPoint) -> Option<usize> {
    if series.is_empty() {
        return None;
    }
    let span = |vals: &[f64]| -> f64 {
        let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (max - min).max(f64::EPSILON)
    };
    let x_span = span(&series.xs);
    let y_span = span(&series.ys);

    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for i in 0..series.len() {
        let dx = (series.xs[i] - cursor.x) / x_span;
        let dy = (series.ys[i] - cursor.y) / y_span;
        let d = dx * dx + dy * dy;
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    Some(best)
}

/// Compact tick labels: 1500000 prints as "1.5M".
pub fn format_compact(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if abs >= 1e4 {
        format!("{:.1}k", v / 1e3)
    } else if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_format_scales_units() {
        assert_eq!(format_compact(1_500_000.0), "1.5M");
        assert_eq!(format_compact(2_000_000_000.0), "2.0B");
        assert_eq!(format_compact(25_000.0), "25.0k");
        assert_eq!(format_compact(1999.0), "1999");
        assert_eq!(format_compact(8.5), "8.50");
    }

    #[test]
    fn nearest_point_normalizes_axis_spans() {
        let mut s = ScatterSeries::default();
        s.push(8.0, 1_000_000.0, "a".into());
        s.push(9.0, 500.0, "b".into());
        // Cursor near x=9: picks "b" even though its y is far in raw units.
        let cursor = PlotPoint::new(8.9, 900_000.0);
        assert_eq!(nearest_point(&s, &cursor), Some(1));
    }
}
