//! Telemetry log loading.
//!
//! Reads a hardware-monitoring log into a column-oriented table of
//! unit-annotated metric series. The log is decoded as ISO-8859-1, byte for
//! byte, so unit strings such as `°C` survive exactly as the monitoring tool
//! wrote them.
//!
//! # Layouts
//!
//! - [`LogLayout::Units`]: line 1 holds the units, line 2 is skipped,
//!   line 3 holds the column labels, data starts on line 4.
//! - [`LogLayout::Descriptor`]: lines 1–2 are banner lines, line 3 holds the
//!   column labels, then one descriptor line per metric column whose fourth
//!   field is the unit, then data.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::schema::{self, POSITIONAL_COLUMNS};

/// Substring that identifies the framerate column.
pub const FRAMERATE_MARKER: &str = "Framerate";

/// Field of a descriptor line that carries the unit.
const DESCRIPTOR_UNIT_FIELD: usize = 3;

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// Header block layout of the input log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLayout {
    #[default]
    #[serde(alias = "units_row")]
    Units,
    Descriptor,
}

impl FromStr for LogLayout {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "units" | "units_row" => Ok(Self::Units),
            "descriptor" | "hml" => Ok(Self::Descriptor),
            other => Err(ReportError::Config(format!(
                "unknown log layout '{other}' (expected 'units' or 'descriptor')"
            ))),
        }
    }
}

impl fmt::Display for LogLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Units => write!(f, "units"),
            Self::Descriptor => write!(f, "descriptor"),
        }
    }
}

/// How to read a log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub layout: LogLayout,
    /// Substring that designates the single framerate column.
    pub framerate_marker: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            layout: LogLayout::Units,
            framerate_marker: FRAMERATE_MARKER.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Series and dataset
// ---------------------------------------------------------------------------

/// One unit-annotated metric sampled once per second.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    identifier: String,
    values: Vec<f64>,
}

impl MetricSeries {
    pub fn new(identifier: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            identifier: identifier.into(),
            values,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn sample_count(&self) -> usize {
        self.values.len()
    }
}

/// Immutable table of metric series recovered from one log.
#[derive(Debug, Clone)]
pub struct Dataset {
    identifiers: Vec<String>,
    metrics: Vec<MetricSeries>,
    framerate: usize,
    sample_count: usize,
}

impl Dataset {
    /// Load a log file from disk.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        if !path.exists() {
            return Err(ReportError::MissingInput(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        log::info!(
            "loading {} ({} bytes, {} layout)",
            path.display(),
            bytes.len(),
            options.layout
        );
        Self::from_text(&decode_latin1(&bytes), options)
    }

    /// Parse an already-decoded log.
    pub fn from_text(text: &str, options: &LoadOptions) -> Result<Self> {
        let (identifiers, data, data_first_line) = read_header_block(text, options.layout)?;
        let columns = parse_rows(data, &identifiers, data_first_line)?;

        let metrics: Vec<MetricSeries> = identifiers[POSITIONAL_COLUMNS..]
            .iter()
            .cloned()
            .zip(columns)
            .map(|(identifier, values)| MetricSeries { identifier, values })
            .collect();

        Self::assemble(identifiers, metrics, &options.framerate_marker)
    }

    /// Build a dataset from already-typed series, in column order.
    pub fn from_series(metrics: Vec<MetricSeries>, framerate_marker: &str) -> Result<Self> {
        let mut identifiers = vec![
            schema::INDEX_COLUMN.to_string(),
            schema::TIMESTAMP_COLUMN.to_string(),
        ];
        identifiers.extend(metrics.iter().map(|m| m.identifier.clone()));
        Self::assemble(identifiers, metrics, framerate_marker)
    }

    fn assemble(
        identifiers: Vec<String>,
        metrics: Vec<MetricSeries>,
        framerate_marker: &str,
    ) -> Result<Self> {
        let sample_count = metrics.first().map_or(0, |m| m.sample_count());
        if let Some(bad) = metrics.iter().find(|m| m.sample_count() != sample_count) {
            return Err(ReportError::Schema(format!(
                "series '{}' has {} samples, expected {}",
                bad.identifier,
                bad.sample_count(),
                sample_count
            )));
        }

        let framerate = unique_match(&metrics, framerate_marker)?;
        log::debug!(
            "dataset: {} metrics x {} samples, framerate column '{}'",
            metrics.len(),
            sample_count,
            metrics[framerate].identifier
        );

        Ok(Self {
            identifiers,
            metrics,
            framerate,
            sample_count,
        })
    }

    /// All column identifiers, positional columns included.
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Metric series in column order (positional columns excluded).
    pub fn metrics(&self) -> &[MetricSeries] {
        &self.metrics
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Series with exactly this identifier.
    pub fn series(&self, identifier: &str) -> Option<&MetricSeries> {
        self.metrics.iter().find(|m| m.identifier == identifier)
    }

    /// The single series whose identifier contains `needle`.
    pub fn find(&self, needle: &str) -> Result<&MetricSeries> {
        unique_match(&self.metrics, needle).map(|i| &self.metrics[i])
    }

    /// The designated framerate series.
    pub fn framerate(&self) -> &MetricSeries {
        &self.metrics[self.framerate]
    }

    /// Whether `series` is the designated framerate series.
    pub fn is_framerate(&self, series: &MetricSeries) -> bool {
        series.identifier == self.metrics[self.framerate].identifier
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Decode ISO-8859-1: every byte is the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn unique_match(metrics: &[MetricSeries], needle: &str) -> Result<usize> {
    let mut matches = metrics
        .iter()
        .enumerate()
        .filter(|(_, m)| m.identifier.contains(needle))
        .map(|(i, _)| i);
    match (matches.next(), matches.next()) {
        (Some(i), None) => Ok(i),
        (None, _) => Err(ReportError::MissingMetric(format!(
            "no column matches '{needle}'"
        ))),
        (Some(_), Some(_)) => Err(ReportError::MissingMetric(format!(
            "more than one column matches '{needle}'"
        ))),
    }
}

/// Line cursor over the header block that tracks how much text it consumed.
struct HeaderLines<'a> {
    lines: std::str::SplitInclusive<'a, char>,
    consumed: usize,
    count: usize,
}

impl<'a> HeaderLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.split_inclusive('\n'),
            consumed: 0,
            count: 0,
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        let line = self.lines.next().ok_or_else(|| {
            ReportError::Schema(format!(
                "log ends before the {what} (line {})",
                self.count + 1
            ))
        })?;
        self.consumed += line.len();
        self.count += 1;
        Ok(line)
    }
}

/// Split off the header block. Returns identifiers, the remaining data text
/// and the 1-based line number of its first line.
fn read_header_block(text: &str, layout: LogLayout) -> Result<(Vec<String>, &str, usize)> {
    let mut lines = HeaderLines::new(text);

    let identifiers = match layout {
        LogLayout::Units => {
            let units_line = lines.next("units row")?;
            lines.next("separator line")?;
            let header_line = lines.next("header row")?;
            schema::recover_identifiers(
                &schema::split_fields(header_line),
                &schema::split_fields(units_line),
            )?
        }
        LogLayout::Descriptor => {
            lines.next("banner")?;
            lines.next("banner")?;
            let header = schema::split_fields(lines.next("header row")?);
            let mut units = vec![""; POSITIONAL_COLUMNS.min(header.len())];
            for _ in POSITIONAL_COLUMNS..header.len() {
                let fields = schema::split_fields(lines.next("column descriptor")?);
                let unit = fields.get(DESCRIPTOR_UNIT_FIELD).copied().ok_or_else(|| {
                    ReportError::Schema(format!(
                        "descriptor line has {} fields, expected a unit in field {}",
                        fields.len(),
                        DESCRIPTOR_UNIT_FIELD + 1
                    ))
                })?;
                units.push(unit);
            }
            schema::recover_identifiers(&header, &units)?
        }
    };

    Ok((identifiers, &text[lines.consumed..], lines.count + 1))
}

/// Parse data rows into one value vector per metric column.
fn parse_rows(data: &str, identifiers: &[String], first_line: usize) -> Result<Vec<Vec<f64>>> {
    let metric_count = identifiers.len().saturating_sub(POSITIONAL_COLUMNS);
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); metric_count];

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    for record in reader.records() {
        let record = record.map_err(|e| ReportError::MalformedRow {
            line: first_line + e.position().map_or(0, |p| p.line() as usize).saturating_sub(1),
            reason: e.to_string(),
        })?;
        let line = first_line + record.position().map_or(0, |p| p.line() as usize).saturating_sub(1);

        if record.len() != identifiers.len() {
            return Err(ReportError::MalformedRow {
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    identifiers.len(),
                    record.len()
                ),
            });
        }

        for (column, (field, identifier)) in columns
            .iter_mut()
            .zip(record.iter().zip(identifiers).skip(POSITIONAL_COLUMNS))
        {
            let value = field.parse::<f64>().map_err(|_| ReportError::MalformedRow {
                line,
                reason: format!("column '{identifier}': cannot parse '{field}' as a number"),
            })?;
            if !value.is_finite() {
                return Err(ReportError::MalformedRow {
                    line,
                    reason: format!("column '{identifier}': non-finite value '{field}'"),
                });
            }
            column.push(value);
        }
    }

    Ok(columns)
}
