//! SVG charts for the benchmark harness.
//!
//! Both charts put one category per position on the x axis (a trial, or a
//! tree size) and one colour per tree.

use std::io;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

const SIZE: (u32, u32) = (900, 540);
/// Share of a category's slot taken up by its bars.
const GROUP_WIDTH: f64 = 0.8;

/// A chart could not be drawn or written.
#[derive(Debug, thiserror::Error)]
#[error("drawing {}: {source}", .path.display())]
pub struct ChartError {
    /// File being written.
    pub path: PathBuf,
    /// Underlying error.
    #[source]
    pub source: DrawingAreaErrorKind<io::Error>,
}

/// One tree's measurements, in category order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend entry.
    pub name: String,
    /// Microseconds per operation.
    pub values: Vec<f64>,
}

type DrawResult = Result<(), DrawingAreaErrorKind<io::Error>>;

/// Grouped bars with one group per trial.
pub fn trial_bars(path: &Path, title: &str, y_desc: &str, series: &[Series]) -> Result<(), ChartError> {
    let trials = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    let label = |x: &f64| match category(*x, trials) {
        Some(t) => format!("trial {}", t + 1),
        None => String::new(),
    };
    draw_bars(path, title, y_desc, trials, &label, series).map_err(|source| ChartError {
        path: path.to_path_buf(),
        source,
    })
}

/// Lines across tree sizes, with `n_values[i]` labelling position `i`.
pub fn trend_lines(
    path: &Path,
    title: &str,
    y_desc: &str,
    n_values: &[usize],
    series: &[Series],
) -> Result<(), ChartError> {
    draw_lines(path, title, y_desc, n_values, series).map_err(|source| ChartError {
        path: path.to_path_buf(),
        source,
    })
}

fn draw_bars(
    path: &Path,
    title: &str,
    y_desc: &str,
    categories: usize,
    label: &dyn Fn(&f64) -> String,
    series: &[Series],
) -> DrawResult {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range(categories), 0.0..y_top(series))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(categories + 1)
        .x_label_formatter(label)
        .y_desc(y_desc)
        .draw()?;

    let width = GROUP_WIDTH / series.len().max(1) as f64;
    for (i, s) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let offset = -GROUP_WIDTH / 2.0 + i as f64 * width;

        chart
            .draw_series(s.values.iter().enumerate().map(|(c, &v)| {
                let x = c as f64 + offset;
                Rectangle::new([(x, 0.0), (x + width, v)], color.filled())
            }))?
            .label(s.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        chart.draw_series(s.values.iter().enumerate().map(|(c, &v)| {
            Text::new(format!("{v:.0}"), (c as f64 + offset, v), ("sans-serif", 11))
        }))?;
    }

    finish(&root, &mut chart)
}

fn draw_lines(path: &Path, title: &str, y_desc: &str, n_values: &[usize], series: &[Series]) -> DrawResult {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let label = |x: &f64| match category(*x, n_values.len()) {
        Some(i) => n_values[i].to_string(),
        None => String::new(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range(n_values.len()), 0.0..y_top(series))?;

    chart
        .configure_mesh()
        .x_labels(n_values.len() + 1)
        .x_label_formatter(&label)
        .x_desc("n")
        .y_desc(y_desc)
        .draw()?;

    for (i, s) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let points = s.values.iter().enumerate().map(|(c, &v)| (c as f64, v));

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)).point_size(3))?
            .label(s.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    finish(&root, &mut chart)
}

fn finish<'a, DB: DrawingBackend + 'a, CT: CoordTranslate>(
    root: &DrawingArea<DB, Shift>,
    chart: &mut ChartContext<'a, DB, CT>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()
}

/// Positions `0..count` with half a slot of padding either side.
fn x_range(count: usize) -> std::ops::Range<f64> {
    -0.5..count.max(1) as f64 - 0.5
}

/// The category an axis position falls on, if it is exactly one.
fn category(x: f64, count: usize) -> Option<usize> {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 || rounded as usize >= count {
        return None;
    }
    Some(rounded as usize)
}

/// Leaves headroom above the tallest value for its label.
fn y_top(series: &[Series]) -> f64 {
    let max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.15
    } else {
        1.0
    }
}
