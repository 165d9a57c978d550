//! CLI for perfreport: turn a benchmark telemetry log into charts and a report.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "perfreport")]
#[command(about = "perfreport: phase-sliced charts and a performance report from a monitoring log")]
#[command(version = perfreport_core::VERSION)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Input and phase options shared by `report` and `stats`.
#[derive(Args)]
pub struct RunArgs {
    /// Telemetry log to read (default: menu_gameplay.hml)
    #[arg(long)]
    input: Option<PathBuf>,

    /// JSON config file; flags given here override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Header layout of the log: units (units row first) or descriptor (hml)
    #[arg(long, value_parser = ["units", "descriptor"])]
    layout: Option<String>,

    /// Metrics to chart, exact identifiers separated by ';'
    #[arg(long)]
    metrics: Option<String>,

    /// End of the menu phase in seconds
    #[arg(long)]
    menu_end: Option<usize>,

    /// Start of the gameplay phase in seconds
    #[arg(long)]
    gameplay_start: Option<usize>,

    /// End of the gameplay phase in seconds
    #[arg(long)]
    gameplay_end: Option<usize>,

    /// Substring that picks the framerate column (default: Framerate)
    #[arg(long)]
    framerate_marker: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every chart and write the Markdown performance report.
    Report {
        #[command(flatten)]
        run: RunArgs,

        /// Report document path (default: "Performance report.md")
        #[arg(long)]
        output: Option<PathBuf>,

        /// Directory for chart images, created if missing (default: plots)
        #[arg(long)]
        plots: Option<PathBuf>,

        /// Also write a machine-readable JSON run summary
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Text file with system details to include in the report
        #[arg(long)]
        system_notes: Option<PathBuf>,

        /// Text file describing the tested title
        #[arg(long)]
        title_notes: Option<PathBuf>,
    },

    /// Print headline and per-phase statistics without rendering charts.
    Stats {
        #[command(flatten)]
        run: RunArgs,

        /// Write statistics as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the recovered column identifiers of a log.
    Columns {
        /// Telemetry log to read
        #[arg(long, default_value = "menu_gameplay.hml")]
        input: PathBuf,

        /// Header layout of the log
        #[arg(long, default_value = "descriptor", value_parser = ["units", "descriptor"])]
        layout: String,
    },
}

fn main() {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Report {
            run,
            output,
            plots,
            summary,
            system_notes,
            title_notes,
        } => commands::report::run(commands::report::ReportCommandConfig {
            run: &run,
            output,
            plots,
            summary_path: summary.as_deref(),
            system_notes_path: system_notes.as_deref(),
            title_notes_path: title_notes.as_deref(),
        }),
        Commands::Stats { run, output } => commands::stats::run(&run, output.as_deref()),
        Commands::Columns { input, layout } => commands::columns::run(&input, &layout),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
