//! Phase-windowed and headline statistics.
//!
//! Only min/max/mean are computed. Values keep full precision; rounding to
//! two decimals happens when they are formatted for the report.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::dataset::{Dataset, FRAMERATE_MARKER, MetricSeries};
use crate::error::{ReportError, Result};
use crate::window::{PhaseWindow, PhaseWindows};

/// Substring identifying the GPU utilization column.
pub const GPU_USAGE_MARKER: &str = "GPU1 usage";
/// Substring identifying the CPU utilization column.
pub const CPU_USAGE_MARKER: &str = "CPU usage";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Min/max/mean of a series restricted to a phase window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Unrestricted extremes of the three marquee metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadlineStatistics {
    pub min_framerate: f64,
    pub max_framerate: f64,
    pub min_gpu_usage: f64,
    pub max_gpu_usage: f64,
    pub min_cpu_usage: f64,
    pub max_cpu_usage: f64,
}

impl HeadlineStatistics {
    /// Report lines, e.g. `Min Framerate, FPS: 41.20`.
    pub fn lines(&self) -> Vec<String> {
        [
            ("Min Framerate, FPS", self.min_framerate),
            ("Max Framerate, FPS", self.max_framerate),
            ("Min GPU1 usage, %", self.min_gpu_usage),
            ("Max GPU1 usage, %", self.max_gpu_usage),
            ("Min CPU usage, %", self.min_cpu_usage),
            ("Max CPU usage, %", self.max_cpu_usage),
        ]
        .iter()
        .map(|(label, value)| format!("{label}: {}", fmt2(*value)))
        .collect()
    }
}

/// Per-phase statistics of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub identifier: String,
    pub full: WindowStatistics,
    pub menu: WindowStatistics,
    pub gameplay: WindowStatistics,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Min/max/mean over `values[start..end]`, clamped to the series length.
pub fn window_stats(series: &MetricSeries, window: PhaseWindow) -> Result<WindowStatistics> {
    let range = window.clamp(series.sample_count());
    let values = &series.values()[range];
    if values.is_empty() {
        return Err(ReportError::EmptyWindow {
            identifier: series.identifier().to_string(),
            window,
            sample_count: series.sample_count(),
        });
    }

    Ok(WindowStatistics {
        min: values.min(),
        max: values.max(),
        mean: values.mean(),
    })
}

/// Extremes over the whole run for framerate, GPU usage and CPU usage.
pub fn headline(dataset: &Dataset) -> Result<HeadlineStatistics> {
    let (min_framerate, max_framerate) = extremes(dataset.find(FRAMERATE_MARKER)?)?;
    let (min_gpu_usage, max_gpu_usage) = extremes(dataset.find(GPU_USAGE_MARKER)?)?;
    let (min_cpu_usage, max_cpu_usage) = extremes(dataset.find(CPU_USAGE_MARKER)?)?;

    Ok(HeadlineStatistics {
        min_framerate,
        max_framerate,
        min_gpu_usage,
        max_gpu_usage,
        min_cpu_usage,
        max_cpu_usage,
    })
}

/// Full, menu and gameplay statistics for one metric.
pub fn summarize(series: &MetricSeries, windows: &PhaseWindows) -> Result<MetricSummary> {
    Ok(MetricSummary {
        identifier: series.identifier().to_string(),
        full: window_stats(series, windows.full)?,
        menu: window_stats(series, windows.menu)?,
        gameplay: window_stats(series, windows.gameplay)?,
    })
}

/// Summaries of the allow-listed metrics, in column order.
pub fn summarize_selected(
    dataset: &Dataset,
    windows: &PhaseWindows,
    allow_list: &[String],
) -> Result<Vec<MetricSummary>> {
    dataset
        .metrics()
        .iter()
        .filter(|m| allow_list.iter().any(|name| name == m.identifier()))
        .map(|m| summarize(m, windows))
        .collect()
}

fn extremes(series: &MetricSeries) -> Result<(f64, f64)> {
    let values = series.values();
    if values.is_empty() {
        return Err(ReportError::MissingMetric(format!(
            "'{}' has no samples",
            series.identifier()
        )));
    }
    Ok((values.min(), values.max()))
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format with two decimal places.
pub fn fmt2(value: f64) -> String {
    format!("{:.2}", round2(value))
}
