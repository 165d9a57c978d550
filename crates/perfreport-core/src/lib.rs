//! # perfreport-core
//!
//! **Turn a hardware-monitoring log into a benchmark report.**
//!
//! `perfreport-core` reads a telemetry log captured while a game runs (one
//! sample per second, one column per sensor), recovers unit-annotated column
//! names, computes statistics over the menu and gameplay phases, and renders
//! one PNG chart per metric and phase.
//!
//! ## Quick Start
//!
//! ```no_run
//! use perfreport_core::{
//!     ChartRenderer, Dataset, LoadOptions, MarkdownReport, PhaseWindows, pipeline, stats,
//! };
//! use std::path::Path;
//!
//! let dataset = Dataset::load(Path::new("menu_gameplay.hml"), &LoadOptions::default())?;
//! let windows = PhaseWindows::from_bounds(25, 100, 300)?;
//!
//! let mut report = MarkdownReport::for_document(Path::new("Performance report.md"));
//! report.add_headline(&stats::headline(&dataset)?);
//!
//! std::fs::create_dir_all("plots")?;
//! let renderer = ChartRenderer::new("plots");
//! let metrics = vec!["CPU usage, %".to_string()];
//! pipeline::run(&dataset, &windows, &metrics, &renderer, &mut report)?;
//! report.save(Path::new("Performance report.md"))?;
//! # Ok::<(), perfreport_core::ReportError>(())
//! ```
//!
//! ## Architecture
//!
//! Log → Schema recovery → Dataset → Statistics / Charts → Report
//!
//! Phase windows are half-open sample-index ranges. Every stage fails with a
//! [`ReportError`]; there is no partial output.

pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod stats;
pub mod window;

pub use chart::{ChartArtifact, ChartKind, ChartRenderer, ChartStyle};
pub use config::{ConfigOverrides, ReportConfig};
pub use dataset::{Dataset, LoadOptions, LogLayout, MetricSeries};
pub use error::{ReportError, Result};
pub use normalize::normalize;
pub use pipeline::ReportSink;
pub use report::{MarkdownReport, RunSummary};
pub use stats::{HeadlineStatistics, MetricSummary, WindowStatistics};
pub use window::{PhaseWindow, PhaseWindows};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
