use std::path::{Path, PathBuf};

use perfreport_core::{
    ChartRenderer, ConfigOverrides, Dataset, MarkdownReport, Result, RunSummary, pipeline, stats,
};

use crate::RunArgs;

pub struct ReportCommandConfig<'a> {
    pub run: &'a RunArgs,
    pub output: Option<PathBuf>,
    pub plots: Option<PathBuf>,
    pub summary_path: Option<&'a Path>,
    pub system_notes_path: Option<&'a Path>,
    pub title_notes_path: Option<&'a Path>,
}

pub fn run(cmd: ReportCommandConfig<'_>) -> Result<()> {
    let overrides = ConfigOverrides {
        document: cmd.output,
        plot_dir: cmd.plots,
        system_notes: cmd.system_notes_path.map(read_notes).transpose()?,
        title_notes: cmd.title_notes_path.map(read_notes).transpose()?,
        ..Default::default()
    };
    let config = super::resolve_config(cmd.run, overrides)?;
    let windows = config.validate()?;

    let dataset = Dataset::load(&config.input, &config.load_options())?;
    let headline = stats::headline(&dataset)?;

    std::fs::create_dir_all(&config.plot_dir)?;
    let renderer = ChartRenderer::new(&config.plot_dir);

    let mut report = MarkdownReport::for_document(&config.document);
    for notes in [&config.system_notes, &config.title_notes].into_iter().flatten() {
        report.add_notes(notes);
    }
    report.add_headline(&headline);

    println!(
        "Charting {} metric(s) from {} ({} samples)...",
        config.metrics.len(),
        config.input.display(),
        dataset.sample_count()
    );
    let artifacts = pipeline::run(&dataset, &windows, &config.metrics, &renderer, &mut report)?;
    report.save(&config.document)?;

    if let Some(path) = cmd.summary_path {
        let metrics = stats::summarize_selected(&dataset, &windows, &config.metrics)?;
        RunSummary::new(&config.input, &dataset, windows, headline, metrics, artifacts.clone())
            .save(path)?;
        println!("Summary saved to: {}", path.display());
    }

    println!();
    for line in headline.lines() {
        println!("  {line}");
    }
    println!(
        "\n{} chart(s) in {}",
        artifacts.len(),
        config.plot_dir.display()
    );
    println!("Report saved to: {}", config.document.display());
    Ok(())
}

fn read_notes(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}
