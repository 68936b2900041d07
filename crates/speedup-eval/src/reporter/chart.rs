//! Speedup and efficiency charts
//!
//! Both charts plot the parallel rows of a comparison table against their
//! thread count, starting from an anchor point at zero threads. The speedup
//! chart overlays the ideal linear speedup `y = x`.

use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{ChartConfig, OutputConfig};
use crate::error::{EvalError, Result};
use crate::table::{RowKind, TableRow};

/// Quantity plotted on the Y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMetric {
    Speedup,
    Efficiency,
}

impl ChartMetric {
    pub fn label(&self) -> &'static str {
        match self {
            ChartMetric::Speedup => "Speedup",
            ChartMetric::Efficiency => "Efficiency",
        }
    }

    /// Y value of the zero-thread anchor point
    fn anchor(&self) -> f64 {
        match self {
            ChartMetric::Speedup => 0.0,
            ChartMetric::Efficiency => 1.0,
        }
    }

    fn value(&self, row: &TableRow) -> f64 {
        match self {
            ChartMetric::Speedup => row.speedup,
            ChartMetric::Efficiency => row.efficiency,
        }
    }
}

/// Points of one chart: the anchor, then one `(threads, value)` per
/// parallel row in table order.
pub fn axes_data(rows: &[TableRow], metric: ChartMetric) -> Vec<(f64, f64)> {
    std::iter::once((0.0, metric.anchor()))
        .chain(
            rows.iter()
                .filter(|row| row.kind == RowKind::Parallel)
                .map(|row| (f64::from(row.thread_count), metric.value(row))),
        )
        .collect()
}

/// Where the value annotation of a speedup point goes, kept off the ideal line.
pub fn speedup_label_position(x: f64, y: f64) -> (f64, f64) {
    let label_x = x - 0.25;
    let mut label_y = y + 0.4;
    if (label_x - label_y).abs() < 0.6 {
        label_y -= if label_y > 1.0 { 1.0 } else { 0.8 };
    }
    (label_x, label_y)
}

/// Renders the two charts of a scenario
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    speedup_file: String,
    efficiency_file: String,
    width: u32,
    height: u32,
}

impl ChartRenderer {
    pub fn new(output: &OutputConfig, chart: &ChartConfig) -> Self {
        Self {
            speedup_file: output.speedup_chart.clone(),
            efficiency_file: output.efficiency_chart.clone(),
            width: chart.width,
            height: chart.height,
        }
    }

    /// Render both charts into `directory`, returning the written paths.
    ///
    /// The image format follows the file extension of the configured names.
    pub fn render(&self, directory: &Path, rows: &[TableRow]) -> Result<Vec<PathBuf>> {
        let speedup_path = directory.join(&self.speedup_file);
        self.draw(&speedup_path, &axes_data(rows, ChartMetric::Speedup), ChartMetric::Speedup)?;

        let efficiency_path = directory.join(&self.efficiency_file);
        self.draw(
            &efficiency_path,
            &axes_data(rows, ChartMetric::Efficiency),
            ChartMetric::Efficiency,
        )?;

        debug!(directory = %directory.display(), "Charts rendered");
        Ok(vec![speedup_path, efficiency_path])
    }

    fn draw(&self, path: &Path, points: &[(f64, f64)], metric: ChartMetric) -> Result<()> {
        let err = chart_error(path);
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(&err)?;

        let x_max = points.iter().map(|p| p.0).fold(1.0, f64::max);
        let y_max = match metric {
            // The ideal line reaches (x_max, x_max); labels sit 0.4 above points
            ChartMetric::Speedup => points.iter().map(|p| p.1).fold(x_max, f64::max) + 0.5,
            ChartMetric::Efficiency => points.iter().map(|p| p.1).fold(1.0, f64::max) + 0.1,
        };

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max)
            .map_err(&err)?;

        chart
            .configure_mesh()
            .bold_line_style(RGBColor(0xbb, 0xbb, 0xbb))
            .light_line_style(WHITE)
            .x_desc("Number of Threads")
            .y_desc(metric.label())
            .draw()
            .map_err(&err)?;

        match metric {
            ChartMetric::Speedup => {
                let ideal: Vec<(f64, f64)> = points.iter().map(|&(x, _)| (x, x)).collect();
                chart
                    .draw_series(LineSeries::new(ideal.iter().copied(), &BLUE))
                    .map_err(&err)?
                    .label("Speedup Ideal")
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
                chart
                    .draw_series(ideal.iter().map(|&p| Cross::new(p, 4, BLUE)))
                    .map_err(&err)?;

                chart
                    .draw_series(LineSeries::new(points.iter().copied(), &RED))
                    .map_err(&err)?
                    .label("Speedup Experimental")
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
                chart
                    .draw_series(points.iter().map(|&p| Circle::new(p, 4, RED.filled())))
                    .map_err(&err)?;

                chart
                    .draw_series(points.iter().skip(1).map(|&(x, y)| {
                        let position = speedup_label_position(x, y);
                        Text::new(format!("{:.3}", y), position, ("sans-serif", 14).into_font())
                    }))
                    .map_err(&err)?;
            }
            ChartMetric::Efficiency => {
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), &GREEN))
                    .map_err(&err)?
                    .label("Efficiency")
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
                chart
                    .draw_series(points.iter().map(|&(x, y)| {
                        Rectangle::new([(x - 0.06, y - 0.012), (x + 0.06, y + 0.012)], GREEN.filled())
                    }))
                    .map_err(&err)?;

                chart
                    .draw_series(points.iter().skip(1).map(|&(x, y)| {
                        Text::new(
                            format!("{:.3}", y),
                            (x - 0.25, y + 0.05),
                            ("sans-serif", 14).into_font(),
                        )
                    }))
                    .map_err(&err)?;
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(&err)?;

        root.present().map_err(&err)?;
        Ok(())
    }
}

fn chart_error<E: std::fmt::Display>(path: &Path) -> impl Fn(E) -> EvalError + '_ {
    move |e| EvalError::Chart {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}
