//! Report configuration.
//!
//! A [`ReportConfig`] starts from built-in defaults, is optionally replaced
//! by a JSON file, and is finally patched by command-line overrides. Every
//! field of the JSON file is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::{FRAMERATE_MARKER, LoadOptions, LogLayout};
use crate::error::{ReportError, Result};
use crate::window::PhaseWindows;

/// Metrics charted when no allow-list is configured.
pub const DEFAULT_METRICS: [&str; 8] = [
    "GPU1 temperature, °C",
    "GPU1 usage, %",
    "CPU temperature, °C",
    "CPU usage, %",
    "RAM usage, MB",
    "Framerate, FPS",
    "HDD1 usage, %",
    "NET3 download rate, MB/s",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Telemetry log to read.
    pub input: PathBuf,
    /// Markdown document to write.
    pub document: PathBuf,
    /// Directory that receives the chart images.
    pub plot_dir: PathBuf,
    /// Exact identifiers of the metrics to chart.
    pub metrics: Vec<String>,
    /// End of the menu phase, in seconds.
    pub menu_end: usize,
    /// Start of the gameplay phase, in seconds.
    pub gameplay_start: usize,
    /// End of the gameplay phase, in seconds.
    pub gameplay_end: usize,
    pub layout: LogLayout,
    /// Substring selecting the series overlaid on every chart.
    pub framerate_marker: String,
    /// Free text describing the test machine.
    pub system_notes: Option<String>,
    /// Free text describing the tested title.
    pub title_notes: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("menu_gameplay.hml"),
            document: PathBuf::from("Performance report.md"),
            plot_dir: PathBuf::from("plots"),
            metrics: DEFAULT_METRICS.iter().map(|m| m.to_string()).collect(),
            menu_end: 25,
            gameplay_start: 100,
            gameplay_end: 300,
            layout: LogLayout::Descriptor,
            framerate_marker: FRAMERATE_MARKER.to_string(),
            system_notes: None,
            title_notes: None,
        }
    }
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub document: Option<PathBuf>,
    pub plot_dir: Option<PathBuf>,
    pub metrics: Option<Vec<String>>,
    pub menu_end: Option<usize>,
    pub gameplay_start: Option<usize>,
    pub gameplay_end: Option<usize>,
    pub layout: Option<LogLayout>,
    pub framerate_marker: Option<String>,
    pub system_notes: Option<String>,
    pub title_notes: Option<String>,
}

impl ReportConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            input,
            document,
            plot_dir,
            metrics,
            menu_end,
            gameplay_start,
            gameplay_end,
            layout,
            framerate_marker,
            system_notes,
            title_notes,
        } = overrides;

        if let Some(v) = input {
            self.input = v;
        }
        if let Some(v) = document {
            self.document = v;
        }
        if let Some(v) = plot_dir {
            self.plot_dir = v;
        }
        if let Some(v) = metrics {
            self.metrics = v;
        }
        if let Some(v) = menu_end {
            self.menu_end = v;
        }
        if let Some(v) = gameplay_start {
            self.gameplay_start = v;
        }
        if let Some(v) = gameplay_end {
            self.gameplay_end = v;
        }
        if let Some(v) = layout {
            self.layout = v;
        }
        if let Some(v) = framerate_marker {
            self.framerate_marker = v;
        }
        if system_notes.is_some() {
            self.system_notes = system_notes;
        }
        if title_notes.is_some() {
            self.title_notes = title_notes;
        }
    }

    /// Build the phase windows, rejecting inverted bounds.
    pub fn validate(&self) -> Result<PhaseWindows> {
        if self.framerate_marker.is_empty() {
            return Err(ReportError::Config(
                "framerate_marker must not be empty".to_string(),
            ));
        }
        PhaseWindows::from_bounds(self.menu_end, self.gameplay_start, self.gameplay_end)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            layout: self.layout,
            framerate_marker: self.framerate_marker.clone(),
        }
    }
}

/// Split a `;`-separated metric list.
///
/// Identifiers themselves contain commas (`CPU usage, %`).
pub fn parse_metric_list(list: &str) -> Vec<String> {
    list.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
