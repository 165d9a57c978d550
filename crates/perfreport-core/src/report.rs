//! Markdown report document and JSON run summary.
//!
//! [`MarkdownReport`] is the [`ReportSink`] the pipeline writes into. The
//! document stays in memory until [`MarkdownReport::save`] is called, so a
//! failed run never leaves a partial report behind.

use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::chart::{ChartArtifact, ChartKind};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::pipeline::ReportSink;
use crate::stats::{HeadlineStatistics, MetricSummary};
use crate::window::PhaseWindows;

pub const REPORT_TITLE: &str = "Performance report";
pub const PAGE_BREAK: &str = "<div style=\"page-break-after: always\"></div>";

// ---------------------------------------------------------------------------
// Markdown document
// ---------------------------------------------------------------------------

pub struct MarkdownReport {
    document_dir: PathBuf,
    generated: String,
    body: String,
}

impl MarkdownReport {
    /// Start a report whose image links are relative to `document_dir`.
    pub fn new(document_dir: impl Into<PathBuf>) -> Self {
        let generated = format_iso8601(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default(),
        );
        let mut body = format!("# {REPORT_TITLE}\n\n");
        body.push_str(&format!("Generated: {generated}\n\n"));
        Self {
            document_dir: document_dir.into(),
            generated,
            body,
        }
    }

    /// Start a report that will be saved at `document`.
    pub fn for_document(document: &Path) -> Self {
        Self::new(document.parent().unwrap_or(Path::new("")))
    }

    pub fn generated(&self) -> &str {
        &self.generated
    }

    /// Free-form block (system details, tested title) copied verbatim.
    pub fn add_notes(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.body.push_str(text);
        self.body.push_str("\n\n");
    }

    pub fn add_headline(&mut self, headline: &HeadlineStatistics) {
        self.body.push_str("**Main results:**\n\n");
        for line in headline.lines() {
            self.body.push_str(&format!("- {line}\n"));
        }
        self.body.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.body)?;
        log::info!("report written to {}", path.display());
        Ok(())
    }

    /// Image link target for `path`, relative to the document when possible.
    fn link_target(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.document_dir).unwrap_or(path);
        let joined = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        if relative.has_root() {
            format!("/{joined}")
        } else {
            joined
        }
    }
}

impl ReportSink for MarkdownReport {
    fn begin_metric(&mut self, identifier: &str) {
        self.page_break();
        self.body.push_str(&format!("## {identifier}\n\n"));
    }

    fn begin_section(&mut self, title: &str) {
        self.body.push_str(&format!("{title}\n\n"));
    }

    fn add_chart(&mut self, artifact: &ChartArtifact) {
        let alt = match artifact.kind {
            ChartKind::Single => format!("{} {}", artifact.metric_identifier, artifact.window),
            ChartKind::Overlay => format!(
                "{} and framerate {}",
                artifact.metric_identifier, artifact.window
            ),
        };
        // Angle brackets allow spaces in the link destination.
        self.body.push_str(&format!(
            "![{alt}](<{}>)\n\n",
            self.link_target(&artifact.file_path)
        ));
    }

    fn page_break(&mut self) {
        self.body.push_str(PAGE_BREAK);
        self.body.push_str("\n\n");
    }
}

// ---------------------------------------------------------------------------
// JSON summary
// ---------------------------------------------------------------------------

/// Machine-readable record of one report run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub generated: String,
    pub input: PathBuf,
    pub sample_count: usize,
    pub framerate_column: String,
    pub windows: PhaseWindows,
    pub headline: HeadlineStatistics,
    pub metrics: Vec<MetricSummary>,
    pub artifacts: Vec<ChartArtifact>,
}

impl RunSummary {
    pub fn new(
        input: &Path,
        dataset: &Dataset,
        windows: PhaseWindows,
        headline: HeadlineStatistics,
        metrics: Vec<MetricSummary>,
        artifacts: Vec<ChartArtifact>,
    ) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated: format_iso8601(
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default(),
            ),
            input: input.to_path_buf(),
            sample_count: dataset.sample_count(),
            framerate_column: dataset.framerate().identifier().to_string(),
            windows,
            headline,
            metrics,
            artifacts,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| std::io::Error::other(e).into())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("summary written to {}", path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Format a duration since the Unix epoch as `2026-02-15T01:30:00Z`.
pub fn format_iso8601(since_epoch: Duration) -> String {
    let secs = since_epoch.as_secs();
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let rem = secs % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        (rem / 60) % 60,
        rem % 60
    )
}

/// Proleptic Gregorian date for a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{FRAMERATE_MARKER, MetricSeries};
    use crate::window::PhaseWindow;

    fn artifact(path: &str, kind: ChartKind) -> ChartArtifact {
        ChartArtifact {
            file_path: PathBuf::from(path),
            metric_identifier: "CPU usage, %".to_string(),
            window: PhaseWindow::new(0, 300).unwrap(),
            kind,
        }
    }

    fn headline() -> HeadlineStatistics {
        HeadlineStatistics {
            min_framerate: 41.2,
            max_framerate: 144.0,
            min_gpu_usage: 12.0,
            max_gpu_usage: 99.0,
            min_cpu_usage: 3.0,
            max_cpu_usage: 71.456,
        }
    }

    // -----------------------------------------------------------------------
    // Document structure
    // -----------------------------------------------------------------------

    #[test]
    fn test_header_blocks_in_order() {
        let mut report = MarkdownReport::new("");
        report.add_notes("System details:\n\nCPU: i9-13980HX\n");
        report.add_notes("   ");
        report.add_notes("Tested title:\n\nWorld of Warships");
        report.add_headline(&headline());

        let text = report.as_str();
        assert!(text.starts_with("# Performance report\n\n"));
        assert!(text.contains(&format!("Generated: {}", report.generated())));
        let system = text.find("System details:").unwrap();
        let title = text.find("Tested title:").unwrap();
        let main = text.find("**Main results:**").unwrap();
        assert!(system < title && title < main);
        assert!(text.contains("- Min Framerate, FPS: 41.20\n"));
        assert!(text.contains("- Max CPU usage, %: 71.46\n"));
    }

    #[test]
    fn test_metric_starts_new_page() {
        let mut report = MarkdownReport::new("out");
        report.begin_metric("CPU usage, %");
        report.begin_section("Menu and Gameplay");
        report.add_chart(&artifact("out/plots/CPU usage, % 0 - 300.png", ChartKind::Single));

        let text = report.as_str();
        let brk = text.find(PAGE_BREAK).unwrap();
        let heading = text.find("## CPU usage, %").unwrap();
        assert!(brk < heading);
        assert!(text.contains("![CPU usage, % 0 - 300](<plots/CPU usage, % 0 - 300.png>)"));
    }

    #[test]
    fn test_overlay_alt_text() {
        let mut report = MarkdownReport::new("");
        report.add_chart(&artifact(
            "plots/CPU usage, % and Framerate, FPS 0 - 300.png",
            ChartKind::Overlay,
        ));
        assert!(
            report
                .as_str()
                .contains("![CPU usage, % and framerate 0 - 300](<plots/CPU usage, % and Framerate, FPS 0 - 300.png>)")
        );
    }

    #[test]
    fn test_link_outside_document_dir_kept() {
        let report = MarkdownReport::new("docs");
        assert_eq!(
            report.link_target(Path::new("/tmp/plots/a.png")),
            "/tmp/plots/a.png"
        );
        assert_eq!(report.link_target(Path::new("docs/./plots/a.png")), "plots/a.png");
    }

    #[test]
    fn test_for_document_uses_parent() {
        let report = MarkdownReport::for_document(Path::new("reports/Performance report.md"));
        assert_eq!(
            report.link_target(Path::new("reports/plots/a.png")),
            "plots/a.png"
        );
    }

    #[test]
    fn test_save_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Performance report.md");
        let mut report = MarkdownReport::for_document(&path);
        report.page_break();
        report.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, report.as_str());
    }

    // -----------------------------------------------------------------------
    // Summary
    // -----------------------------------------------------------------------

    #[test]
    fn test_summary_json_fields() {
        let dataset = Dataset::from_series(
            vec![MetricSeries::new("Framerate, FPS", vec![60.0, 61.0, 59.0])],
            FRAMERATE_MARKER,
        )
        .unwrap();
        let windows = PhaseWindows::from_bounds(1, 1, 3).unwrap();
        let summary = RunSummary::new(
            Path::new("menu_gameplay.hml"),
            &dataset,
            windows,
            headline(),
            Vec::new(),
            vec![artifact("plots/a.png", ChartKind::Single)],
        );

        let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(value["sample_count"], 3);
        assert_eq!(value["framerate_column"], "Framerate, FPS");
        assert_eq!(value["windows"]["gameplay"]["start_index"], 1);
        assert_eq!(value["artifacts"][0]["kind"], "single");
        assert_eq!(value["run_id"].as_str().unwrap().len(), 36);
    }

    // -----------------------------------------------------------------------
    // ISO-8601 formatting
    // -----------------------------------------------------------------------

    #[test]
    fn test_format_iso8601_epoch() {
        assert_eq!(format_iso8601(Duration::from_secs(0)), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_format_iso8601_known_dates() {
        assert_eq!(
            format_iso8601(Duration::from_secs(1_771_119_000)),
            "2026-02-15T01:30:00Z"
        );
        assert_eq!(
            format_iso8601(Duration::from_secs(1_709_251_199)),
            "2024-02-29T23:59:59Z"
        );
    }
}
