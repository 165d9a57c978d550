//! PNG chart rendering.
//!
//! Two chart kinds are produced, both as one PNG per call:
//! - **single**: one metric against sample index, optionally captioned with
//!   the window's max/min/average;
//! - **overlay**: one metric and the framerate, each scaled by
//!   [`normalize`](crate::normalize::normalize), on a shared time axis. The
//!   caption and legend name both series by identifier.
//!
//! The x-domain is limited to the phase window through the axis range. File
//! names depend only on the metric identifier and the window, so re-running
//! a report overwrites the previous images.

mod backend;

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Serialize;

use crate::dataset::MetricSeries;
use crate::error::{ReportError, Result};
use crate::normalize::normalize;
use crate::stats::{WindowStatistics, fmt2, window_stats};
use crate::window::PhaseWindow;

pub use backend::FontSafeBackend;

const METRIC_COLOR: RGBColor = RGBColor(31, 119, 180);
const FRAMERATE_COLOR: RGBColor = RGBColor(255, 127, 14);
/// Height of the strip under the plot that holds the statistics caption.
const CAPTION_HEIGHT: u32 = 70;
const X_LABEL: &str = "Time, Sec";
const FRAMERATE_LABEL: &str = "Framerate, FPS";

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Single,
    Overlay,
}

/// A chart written to disk, referenced by path from here on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartArtifact {
    pub file_path: PathBuf,
    pub metric_identifier: String,
    pub window: PhaseWindow,
    pub kind: ChartKind,
}

/// Pixel size of rendered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
        }
    }
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Make an identifier safe to use as a file name (`/` and `\` become `-`).
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier.replace(['/', '\\'], "-")
}

/// `"<identifier> <start> - <end>.png"`
pub fn single_chart_name(identifier: &str, window: PhaseWindow) -> String {
    format!("{} {}.png", sanitize_identifier(identifier), window)
}

/// `"<identifier> and Framerate, FPS <start> - <end>.png"`
pub fn overlay_chart_name(identifier: &str, window: PhaseWindow) -> String {
    format!(
        "{} and {FRAMERATE_LABEL} {}.png",
        sanitize_identifier(identifier),
        window
    )
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Writes chart images into an existing output directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            style: ChartStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render one metric over `window`. With `annotate`, the window's
    /// max/min/average are computed and printed under the plot; an empty
    /// window is then an error.
    pub fn render_single(
        &self,
        series: &MetricSeries,
        window: PhaseWindow,
        annotate: bool,
    ) -> Result<ChartArtifact> {
        let stats = if annotate {
            Some(window_stats(series, window)?)
        } else {
            None
        };
        let path = self.target(&single_chart_name(series.identifier(), window))?;

        let root = FontSafeBackend::new(BitMapBackend::new(&path, self.size())).into_drawing_area();
        draw_single(root, series, window, stats.as_ref()).map_err(|e| chart_error(&path, e))?;
        log::debug!("wrote {}", path.display());

        Ok(ChartArtifact {
            file_path: path,
            metric_identifier: series.identifier().to_string(),
            window,
            kind: ChartKind::Single,
        })
    }

    /// Render `series` and `framerate` together, both range-scaled. Returns
    /// `Ok(None)` without touching the disk when `series` is the framerate
    /// series itself.
    pub fn render_overlay(
        &self,
        series: &MetricSeries,
        framerate: &MetricSeries,
        window: PhaseWindow,
    ) -> Result<Option<ChartArtifact>> {
        if series.identifier() == framerate.identifier() {
            log::debug!("skipping self-overlay for '{}'", series.identifier());
            return Ok(None);
        }
        let path = self.target(&overlay_chart_name(series.identifier(), window))?;

        let root = FontSafeBackend::new(BitMapBackend::new(&path, self.size())).into_drawing_area();
        draw_overlay(root, series, framerate, window).map_err(|e| chart_error(&path, e))?;
        log::debug!("wrote {}", path.display());

        Ok(Some(ChartArtifact {
            file_path: path,
            metric_identifier: series.identifier().to_string(),
            window,
            kind: ChartKind::Overlay,
        }))
    }

    fn size(&self) -> (u32, u32) {
        (self.style.width, self.style.height)
    }

    fn target(&self, file_name: &str) -> Result<PathBuf> {
        if !self.output_dir.is_dir() {
            return Err(ReportError::OutputDirMissing(self.output_dir.clone()));
        }
        Ok(self.output_dir.join(file_name))
    }
}

fn chart_error(path: &Path, e: impl std::fmt::Display) -> ReportError {
    ReportError::Chart {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

type DrawResult<DB> = std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

fn draw_single<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    series: &MetricSeries,
    window: PhaseWindow,
    stats: Option<&WindowStatistics>,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let (plot_area, caption_area) = match stats {
        Some(_) => {
            let height = root.dim_in_pixel().1.saturating_sub(CAPTION_HEIGHT);
            let (upper, lower) = root.split_vertically(height as i32);
            (upper, Some(lower))
        }
        None => (root.clone(), None),
    };

    let points = visible_points(series.values(), window);
    let (y_lo, y_hi) = y_bounds(points.iter().map(|&(_, y)| y));

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(series.identifier(), font(28.0))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_range(window), y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(series.identifier())
        .label_style(font(16.0))
        .draw()?;

    chart.draw_series(LineSeries::new(points, METRIC_COLOR.stroke_width(2)))?;

    if let (Some(stats), Some(area)) = (stats, caption_area) {
        let style = font(20.0).color(&BLACK);
        let extremes = format!("Max = {}  Min = {}", fmt2(stats.max), fmt2(stats.min));
        area.draw_text(&extremes, &style, (40, 10))?;
        area.draw_text(&format!("Average = {}", fmt2(stats.mean)), &style, (40, 38))?;
    }

    root.present()?;
    Ok(())
}

fn draw_overlay<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    series: &MetricSeries,
    framerate: &MetricSeries,
    window: PhaseWindow,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let metric_points = visible_points(&normalize(series.values()), window);
    let framerate_points = visible_points(&normalize(framerate.values()), window);
    let (y_lo, y_hi) = y_bounds(
        metric_points
            .iter()
            .chain(&framerate_points)
            .map(|&(_, y)| y),
    );

    let labels = overlay_labels(series, framerate);
    let mut chart = ChartBuilder::on(&root)
        .caption(&labels.title, font(28.0))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 30)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_range(window), y_lo..y_hi)?;

    // Scaled values carry no unit, so the y tick labels are blanked.
    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_label_formatter(&|_| String::new())
        .label_style(font(16.0))
        .draw()?;

    chart
        .draw_series(LineSeries::new(metric_points, METRIC_COLOR.stroke_width(2)))?
        .label(labels.metric)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], METRIC_COLOR.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(framerate_points, FRAMERATE_COLOR.stroke_width(2)))?
        .label(labels.framerate)
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 30, y)], FRAMERATE_COLOR.stroke_width(2))
        });

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .label_font(font(16.0))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Caption and legend text of an overlay chart.
#[derive(Debug, PartialEq)]
struct OverlayLabels<'a> {
    title: String,
    metric: &'a str,
    framerate: &'a str,
}

fn overlay_labels<'a>(series: &'a MetricSeries, framerate: &'a MetricSeries) -> OverlayLabels<'a> {
    OverlayLabels {
        title: format!("{} and {}", series.identifier(), framerate.identifier()),
        metric: series.identifier(),
        framerate: framerate.identifier(),
    }
}

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

fn x_range(window: PhaseWindow) -> std::ops::Range<f64> {
    window.start_index() as f64..window.end_index() as f64
}

/// Points of `values` whose sample index falls inside the window's axis
/// range `[start, end]`.
fn visible_points(values: &[f64], window: PhaseWindow) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .skip(window.start_index())
        .take_while(|&(i, _)| i <= window.end_index())
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

/// Y-axis range covering `values` with a 5% margin; `0..1` when empty.
fn y_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}
