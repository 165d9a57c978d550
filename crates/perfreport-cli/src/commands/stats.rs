use std::path::Path;

use perfreport_core::stats::{self, fmt2};
use perfreport_core::{ConfigOverrides, Dataset, MetricSummary, Result, WindowStatistics};

use crate::RunArgs;

pub fn run(run: &RunArgs, output_path: Option<&Path>) -> Result<()> {
    let config = super::resolve_config(run, ConfigOverrides::default())?;
    let windows = config.validate()?;
    let dataset = Dataset::load(&config.input, &config.load_options())?;
    let headline = stats::headline(&dataset)?;
    let summaries = stats::summarize_selected(&dataset, &windows, &config.metrics)?;

    println!(
        "{} ({} samples, framerate column '{}')\n",
        config.input.display(),
        dataset.sample_count(),
        dataset.framerate().identifier()
    );
    for line in headline.lines() {
        println!("  {line}");
    }

    println!("\n{}", "=".repeat(96));
    println!(
        "{:<32} {:<10} {:>16} {:>16} {:>16}",
        "Metric", "Stat", "Menu and Gameplay", "Menu", "Gameplay"
    );
    println!(
        "{:<32} {:<10} {:>16} {:>16} {:>16}",
        "",
        "",
        windows.full.to_string(),
        windows.menu.to_string(),
        windows.gameplay.to_string()
    );
    println!("{}", "-".repeat(96));
    for summary in &summaries {
        print_summary(summary);
    }

    if let Some(path) = output_path {
        let json = serde_json::json!({
            "input": config.input.display().to_string(),
            "sample_count": dataset.sample_count(),
            "windows": windows,
            "headline": headline,
            "metrics": summaries,
        });
        let text = serde_json::to_string_pretty(&json).map_err(std::io::Error::other)?;
        std::fs::write(path, text)?;
        println!("\nStatistics saved to: {}", path.display());
    }
    Ok(())
}

fn print_summary(summary: &MetricSummary) {
    let rows: [(&str, fn(&WindowStatistics) -> f64); 3] = [
        ("min", |s| s.min),
        ("max", |s| s.max),
        ("mean", |s| s.mean),
    ];
    for (i, (label, pick)) in rows.iter().enumerate() {
        let name = if i == 0 { summary.identifier.as_str() } else { "" };
        println!(
            "{:<32} {:<10} {:>16} {:>16} {:>16}",
            name,
            label,
            fmt2(pick(&summary.full)),
            fmt2(pick(&summary.menu)),
            fmt2(pick(&summary.gameplay))
        );
    }
}
