pub mod columns;
pub mod report;
pub mod stats;

use perfreport_core::config::parse_metric_list;
use perfreport_core::{ConfigOverrides, ReportConfig, Result};

use crate::RunArgs;

/// Install the logger. `RUST_LOG` wins over the `-v` count.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Defaults, then the `--config` file, then command-line flags.
pub fn resolve_config(run: &RunArgs, overrides: ConfigOverrides) -> Result<ReportConfig> {
    let mut config = match &run.config {
        Some(path) => ReportConfig::from_json_file(path)?,
        None => ReportConfig::default(),
    };

    let layout = run.layout.as_deref().map(str::parse).transpose()?;
    config.apply_overrides(ConfigOverrides {
        input: run.input.clone(),
        metrics: run.metrics.as_deref().map(parse_metric_list),
        menu_end: run.menu_end,
        gameplay_start: run.gameplay_start,
        gameplay_end: run.gameplay_end,
        layout,
        framerate_marker: run.framerate_marker.clone(),
        ..overrides
    });
    log::debug!("resolved config: {config:?}");
    Ok(config)
}
