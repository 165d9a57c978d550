//! Per-metric chart sequencing.
//!
//! For every allow-listed metric, in column order:
//!
//! ```text
//! begin_metric
//! section "Menu and Gameplay"  overlay(full)  single(full)
//! page_break
//! section "Menu"               single(menu)
//! section "Gameplay"           single(gameplay)
//! ```
//!
//! Windows are checked against the sample count before the first chart is
//! drawn. Each artifact is handed to the [`ReportSink`] only after its file
//! has been written. Metrics not on the allow-list get no statistics and no
//! charts.

use crate::chart::{ChartArtifact, ChartRenderer};
use crate::dataset::{Dataset, MetricSeries};
use crate::error::{ReportError, Result};
use crate::window::PhaseWindows;

pub const SECTION_FULL: &str = "Menu and Gameplay";
pub const SECTION_MENU: &str = "Menu";
pub const SECTION_GAMEPLAY: &str = "Gameplay";

/// Receives the report structure as the pipeline produces it.
pub trait ReportSink {
    fn begin_metric(&mut self, identifier: &str);
    fn begin_section(&mut self, title: &str);
    fn add_chart(&mut self, artifact: &ChartArtifact);
    fn page_break(&mut self);
}

/// Render every chart for the allow-listed metrics of `dataset`.
pub fn run(
    dataset: &Dataset,
    windows: &PhaseWindows,
    allow_list: &[String],
    renderer: &ChartRenderer,
    sink: &mut impl ReportSink,
) -> Result<Vec<ChartArtifact>> {
    for name in allow_list {
        if dataset.series(name).is_none() {
            log::warn!("allow-listed metric '{name}' is not in the log");
        }
    }

    let selected: Vec<&MetricSeries> = dataset
        .metrics()
        .iter()
        .filter(|m| allow_list.iter().any(|name| name == m.identifier()))
        .collect();
    if let Some(first) = selected.first() {
        check_windows(first, windows)?;
    }

    let framerate = dataset.framerate();
    let mut artifacts = Vec::new();
    let mut emit = |sink: &mut dyn ReportSink, artifact: ChartArtifact| {
        sink.add_chart(&artifact);
        artifacts.push(artifact);
    };

    for series in selected {
        log::info!("charting '{}'", series.identifier());
        sink.begin_metric(series.identifier());

        sink.begin_section(SECTION_FULL);
        if let Some(overlay) = renderer.render_overlay(series, framerate, windows.full)? {
            emit(sink, overlay);
        }
        emit(sink, renderer.render_single(series, windows.full, true)?);

        sink.page_break();
        sink.begin_section(SECTION_MENU);
        emit(sink, renderer.render_single(series, windows.menu, true)?);

        sink.begin_section(SECTION_GAMEPLAY);
        emit(sink, renderer.render_single(series, windows.gameplay, true)?);
    }

    Ok(artifacts)
}

/// Fail before any chart is written if a window selects no samples. All
/// series share one sample count, so checking one series covers them all.
fn check_windows(series: &MetricSeries, windows: &PhaseWindows) -> Result<()> {
    for window in [windows.full, windows.menu, windows.gameplay] {
        if window.clamp(series.sample_count()).is_empty() {
            return Err(ReportError::EmptyWindow {
                identifier: series.identifier().to_string(),
                window,
                sample_count: series.sample_count(),
            });
        }
    }
    Ok(())
}
