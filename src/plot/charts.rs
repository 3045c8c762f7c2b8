//! SVG line charts written with Plotters.
//!
//! The SVG backend keeps chart output free of system font dependencies.
//!
//! A [`LineChart`] is a render-only description: all series and labels are
//! computed by the caller, so `render_svg` only draws.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::error::AppError;

const CHART_SIZE: (u32, u32) = (1000, 600);

const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    Markers,
}

/// One named series of a chart.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
    /// Whether the series participates in the y-range.
    ///
    /// Unbounded series (for example a high-degree Lagrange curve) are clamped
    /// to the range set by the others.
    pub sets_range: bool,
}

impl ChartSeries {
    pub fn line(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
            style: SeriesStyle::Line,
            sets_range: true,
        }
    }

    pub fn markers(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            style: SeriesStyle::Markers,
            ..Self::line(label, points)
        }
    }

    /// Exclude this series from the y-range computation.
    pub fn clamped(mut self) -> Self {
        self.sets_range = false;
        self
    }
}

/// A render-only line chart description.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
}

impl LineChart {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    /// X and y bounds over finite points, padded by 5%.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let x = finite_range(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))?;
        let y = finite_range(
            self.series
                .iter()
                .filter(|s| s.sets_range)
                .flat_map(|s| s.points.iter().map(|p| p.1)),
        )?;
        Some((pad(x), pad(y)))
    }

    /// Draw the chart to an SVG file.
    pub fn render_svg(&self, path: &Path) -> Result<(), AppError> {
        self.draw(path)
            .map_err(|e| AppError::new(2, format!("Failed to render chart '{}': {e}", path.display())))
    }

    fn draw(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let Some(((x0, x1), (y0, y1))) = self.bounds() else {
            root.draw(&Text::new(
                format!("{}: no finite data", self.title),
                (40, 40),
                ("sans-serif", 20).into_font().color(&BLACK),
            ))?;
            root.present()?;
            return Ok(());
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()?;

        for (idx, series) in self.series.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|&(x, y)| (x, y.clamp(y0, y1)))
                .collect();

            match series.style {
                SeriesStyle::Line => {
                    chart
                        .draw_series(LineSeries::new(points, color.stroke_width(2)))?
                        .label(series.label.as_str())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
                }
                SeriesStyle::Markers => {
                    chart
                        .draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))?
                        .label(series.label.as_str())
                        .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
                }
            }
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    let margin = if span > 0.0 { span * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - margin, hi + margin)
}
