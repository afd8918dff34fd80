//! Static chart renderer.
//!
//! Renders a chart card to in-memory PNG bytes with plotters so the export
//! path never touches the live egui surface.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use plotters::element::Pie;
use plotters::prelude::*;
use thiserror::Error;

use crate::agg::{AggregateSeries, ScatterSeries};
use crate::charts::plotter::format_compact;
use crate::charts::{ChartData, ChartPlot};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Chart rendering failed: {0}")]
    Render(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Palette matching the interactive charts.
const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(255, 87, 34),
    RGBColor(121, 85, 72),
];

fn render_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Render(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one chart card to PNG bytes.
    pub fn render_chart_to_bytes(
        data: &ChartData,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ExportError> {
        let mut buf = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            match &data.plot {
                ChartPlot::Bar(series) | ChartPlot::Histogram(series) => {
                    Self::draw_bars(&root, data, series)?
                }
                ChartPlot::Line(series) => Self::draw_line(&root, data, series)?,
                ChartPlot::Pie(series) => Self::draw_pie(&root, data, series, width, height)?,
                ChartPlot::Scatter(series) => Self::draw_scatter(&root, data, series)?,
            }

            root.present().map_err(render_err)?;
        }

        let img = RgbImage::from_raw(width, height, buf)
            .ok_or_else(|| ExportError::Render("pixel buffer size mismatch".to_string()))?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    fn draw_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        data: &ChartData,
        series: &AggregateSeries,
    ) -> Result<(), ExportError> {
        if series.is_empty() {
            return Self::draw_empty(root, &data.title);
        }

        let n = series.len();
        let max = series.values.iter().copied().fold(0.0, f64::max);
        let fill = if matches!(data.plot, ChartPlot::Histogram(_)) {
            PALETTE[1]
        } else {
            PALETTE[0]
        };

        let mut chart = ChartBuilder::on(root)
            .caption(&data.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(52)
            .build_cartesian_2d(0f64..n as f64, 0f64..(max * 1.1).max(1.0))
            .map_err(render_err)?;

        let labels = series.labels.clone();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n.min(12))
            .x_label_formatter(&|x| labels.get(x.floor() as usize).cloned().unwrap_or_default())
            .y_label_formatter(&|y| format_compact(*y))
            .x_desc(data.x_label.clone())
            .y_desc(data.y_label.clone())
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(series.values.iter().enumerate().map(|(i, &v)| {
                Rectangle::new([(i as f64 + 0.2, 0.0), (i as f64 + 0.8, v)], fill.filled())
            }))
            .map_err(render_err)?;
        Ok(())
    }

    fn draw_line<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        data: &ChartData,
        series: &AggregateSeries,
    ) -> Result<(), ExportError> {
        if series.is_empty() {
            return Self::draw_empty(root, &data.title);
        }

        let n = series.len();
        let max = series.values.iter().copied().fold(0.0, f64::max);
        let color = PALETTE[2];

        let mut chart = ChartBuilder::on(root)
            .caption(&data.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(52)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..(max * 1.1).max(1.0))
            .map_err(render_err)?;

        let labels = series.labels.clone();
        chart
            .configure_mesh()
            .x_labels(n.min(12))
            .x_label_formatter(&|x| {
                labels
                    .get(x.round().max(0.0) as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .y_label_formatter(&|y| format_compact(*y))
            .x_desc(data.x_label.clone())
            .y_desc(data.y_label.clone())
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(
                series.values.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                color.stroke_width(2),
            ))
            .map_err(render_err)?;
        chart
            .draw_series(
                series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Circle::new((i as f64, v), 3, color.filled())),
            )
            .map_err(render_err)?;
        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        data: &ChartData,
        series: &ScatterSeries,
    ) -> Result<(), ExportError> {
        if series.is_empty() {
            return Self::draw_empty(root, &data.title);
        }

        let (x_min, x_max) = min_max(&series.xs);
        let (y_min, y_max) = min_max(&series.ys);
        let x_pad = ((x_max - x_min) * 0.05).max(0.5);
        let y_pad = ((y_max - y_min) * 0.05).max(0.5);

        let mut chart = ChartBuilder::on(root)
            .caption(&data.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(64)
            .build_cartesian_2d(
                (x_min - x_pad)..(x_max + x_pad),
                (y_min - y_pad)..(y_max + y_pad),
            )
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .y_label_formatter(&|y| format_compact(*y))
            .x_desc(data.x_label.clone())
            .y_desc(data.y_label.clone())
            .draw()
            .map_err(render_err)?;

        let color = PALETTE[3];
        chart
            .draw_series(
                series
                    .xs
                    .iter()
                    .zip(series.ys.iter())
                    .map(|(&x, &y)| Circle::new((x, y), 2, color.mix(0.7).filled())),
            )
            .map_err(render_err)?;
        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        data: &ChartData,
        series: &AggregateSeries,
        width: u32,
        height: u32,
    ) -> Result<(), ExportError> {
        if series.is_empty() || series.total() <= 0.0 {
            return Self::draw_empty(root, &data.title);
        }

        let titled = root
            .titled(&data.title, ("sans-serif", 22))
            .map_err(render_err)?;

        let center = ((width / 2) as i32, (height / 2) as i32);
        let radius = (width.min(height) as f64) * 0.32;
        let colors: Vec<RGBColor> = (0..series.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();

        let mut pie = Pie::new(&center, &radius, &series.values, &colors, &series.labels);
        pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
        titled.draw(&pie).map_err(render_err)?;
        Ok(())
    }

    fn draw_empty<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        title: &str,
    ) -> Result<(), ExportError> {
        let (w, h) = root.dim_in_pixel();
        root.draw(&Text::new(
            format!("{title}: no data"),
            ((w / 2) as i32 - 60, (h / 2) as i32),
            ("sans-serif", 16).into_font().color(&BLACK),
        ))
        .map_err(render_err)?;
        Ok(())
    }
}

fn min_max(vals: &[f64]) -> (f64, f64) {
    let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartSlot;

    #[test]
    fn renders_a_bar_chart_to_valid_png() {
        let data = ChartData {
            slot: ChartSlot::CategoryBar,
            title: "Top Categories".into(),
            caption: String::new(),
            x_label: "Category".into(),
            y_label: "Records".into(),
            plot: ChartPlot::Bar(AggregateSeries::new(
                vec!["Drama".into(), "Action".into()],
                vec![12.0, 7.0],
            )),
        };
        let png = StaticChartRenderer::render_chart_to_bytes(&data, 640, 480).unwrap();
        // PNG signature
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn empty_series_render_placeholder_instead_of_failing() {
        let data = ChartData {
            slot: ChartSlot::CategoryPie,
            title: "Shares".into(),
            caption: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            plot: ChartPlot::Pie(AggregateSeries::default()),
        };
        assert!(StaticChartRenderer::render_chart_to_bytes(&data, 320, 240).is_ok());
    }
}
