//! Integration tests for perfreport-core.
//!
//! These tests drive the full report pipeline on small synthetic logs:
//! log file → dataset → statistics → charts → report document.

use std::collections::BTreeSet;
use std::path::Path;

use perfreport_core::dataset::decode_latin1;
use perfreport_core::report::PAGE_BREAK;
use perfreport_core::{
    ChartKind, ChartRenderer, ChartStyle, Dataset, LoadOptions, LogLayout, MarkdownReport,
    PhaseWindows, ReportError, RunSummary, pipeline, stats,
};

const CPU: &str = "CPU usage, %";
/// Units row with a zero-width space after the last unit, as some monitoring
/// tools emit it.
const UNITS_ROW: &str = ",-,%,%\u{200b}";

/// GPU identifier as recovered from the UTF-8 bytes of `UNITS_ROW`, which
/// the loader reads as ISO-8859-1.
fn gpu() -> String {
    format!("GPU1 usage, {}", decode_latin1("%\u{200b}".as_bytes()))
}

/// Ten samples, CPU usage 10..=100, no framerate column.
fn write_units_log(dir: &Path) -> std::path::PathBuf {
    let mut text = format!("{UNITS_ROW}\nskipped\nidx,time,CPU usage,GPU1 usage\n");
    for i in 0..10 {
        text.push_str(&format!("{i},{i},{},{}\n", (i + 1) * 10, 40 + i));
    }
    let path = dir.join("menu_gameplay.csv");
    std::fs::write(&path, text).unwrap();
    path
}

/// CPU usage stands in for the framerate column.
fn cpu_as_framerate() -> LoadOptions {
    LoadOptions {
        layout: LogLayout::Units,
        framerate_marker: "CPU usage".to_string(),
    }
}

fn small_renderer(dir: &Path) -> ChartRenderer {
    ChartRenderer::new(dir).with_style(ChartStyle {
        width: 320,
        height: 240,
    })
}

fn png_names(dir: &Path) -> BTreeSet<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn end_to_end_menu_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_units_log(dir.path());
    let dataset = Dataset::load(&path, &cpu_as_framerate()).unwrap();

    assert_eq!(dataset.sample_count(), 10);
    assert_eq!(dataset.identifiers(), ["-", "timestamp", CPU, gpu().as_str()]);

    let windows = PhaseWindows::from_bounds(3, 3, 10).unwrap();
    let cpu = dataset.series(CPU).unwrap();
    let menu = stats::window_stats(cpu, windows.menu).unwrap();
    assert_eq!((menu.min, menu.max, menu.mean), (10.0, 30.0, 20.0));

    let gameplay = stats::window_stats(cpu, windows.gameplay).unwrap();
    assert_eq!((gameplay.min, gameplay.max), (40.0, 100.0));
}

#[test]
fn units_row_text_keeps_zero_width_space() {
    let mut text = format!("{UNITS_ROW}\n\nidx,time,CPU usage,GPU1 usage\n");
    for i in 0..10 {
        text.push_str(&format!("{i},{i},{},{}\n", (i + 1) * 10, 40 + i));
    }
    let dataset = Dataset::from_text(&text, &cpu_as_framerate()).unwrap();
    assert_eq!(
        dataset.identifiers(),
        ["-", "timestamp", CPU, "GPU1 usage, %\u{200b}"]
    );

    let windows = PhaseWindows::from_bounds(3, 3, 10).unwrap();
    let menu = stats::window_stats(dataset.series(CPU).unwrap(), windows.menu).unwrap();
    assert_eq!((menu.min, menu.max, menu.mean), (10.0, 30.0, 20.0));
}

#[test]
fn end_to_end_self_overlay_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_units_log(dir.path());
    let dataset = Dataset::load(&path, &cpu_as_framerate()).unwrap();
    assert_eq!(dataset.framerate().identifier(), CPU);

    let plots = dir.path().join("plots");
    std::fs::create_dir(&plots).unwrap();
    let windows = PhaseWindows::from_bounds(3, 3, 10).unwrap();
    let mut report = MarkdownReport::new(dir.path());
    let artifacts = pipeline::run(
        &dataset,
        &windows,
        &[CPU.to_string()],
        &small_renderer(&plots),
        &mut report,
    )
    .unwrap();

    assert_eq!(artifacts.len(), 3);
    assert_eq!(
        artifacts.iter().filter(|a| a.kind == ChartKind::Overlay).count(),
        0
    );
    assert_eq!(png_names(&plots).len(), 3);
}

#[test]
fn other_metrics_get_framerate_overlay() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_units_log(dir.path());
    let dataset = Dataset::load(&path, &cpu_as_framerate()).unwrap();
    let windows = PhaseWindows::from_bounds(3, 3, 10).unwrap();

    let mut report = MarkdownReport::new(dir.path());
    let artifacts = pipeline::run(
        &dataset,
        &windows,
        &[gpu()],
        &small_renderer(dir.path()),
        &mut report,
    )
    .unwrap();

    let overlays: Vec<_> = artifacts
        .iter()
        .filter(|a| a.kind == ChartKind::Overlay)
        .collect();
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays[0].window, windows.full);
    assert!(overlays[0].file_path.exists());
}

#[test]
fn repeated_runs_overwrite_same_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_units_log(dir.path());
    let dataset = Dataset::load(&path, &cpu_as_framerate()).unwrap();
    let windows = PhaseWindows::from_bounds(3, 3, 10).unwrap();
    let plots = dir.path().join("plots");
    std::fs::create_dir(&plots).unwrap();
    let allow = vec![CPU.to_string(), gpu()];

    let mut first_paths = Vec::new();
    for _ in 0..2 {
        let mut report = MarkdownReport::new(dir.path());
        let artifacts =
            pipeline::run(&dataset, &windows, &allow, &small_renderer(&plots), &mut report)
                .unwrap();
        let paths: Vec<_> = artifacts.into_iter().map(|a| a.file_path).collect();
        if first_paths.is_empty() {
            first_paths = paths;
        } else {
            assert_eq!(paths, first_paths);
        }
    }
    assert_eq!(png_names(&plots).len(), first_paths.len());
}

#[test]
fn report_pages_follow_metric_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_units_log(dir.path());
    let dataset = Dataset::load(&path, &cpu_as_framerate()).unwrap();
    let windows = PhaseWindows::from_bounds(3, 3, 10).unwrap();
    let plots = dir.path().join("plots");
    std::fs::create_dir(&plots).unwrap();

    let document = dir.path().join("Performance report.md");
    let mut report = MarkdownReport::for_document(&document);
    report.add_notes("System details:\n\nCPU: test bench");
    pipeline::run(
        &dataset,
        &windows,
        &[gpu(), CPU.to_string()],
        &small_renderer(&plots),
        &mut report,
    )
    .unwrap();
    report.save(&document).unwrap();

    let text = std::fs::read_to_string(&document).unwrap();
    // Column order, not allow-list order.
    let cpu_heading = text.find("## CPU usage, %\n").unwrap();
    let gpu_heading = text.find("## GPU1 usage").unwrap();
    assert!(cpu_heading < gpu_heading);

    let gpu_part = &text[gpu_heading..];
    let full = gpu_part.find("Menu and Gameplay").unwrap();
    let overlay = gpu_part.find("and framerate 0 - 10").unwrap();
    let brk = gpu_part.find(PAGE_BREAK).unwrap();
    let menu = gpu_part.find("\nMenu\n").unwrap();
    let gameplay = gpu_part.find("\nGameplay\n").unwrap();
    assert!(full < overlay && overlay < brk && brk < menu && menu < gameplay);

    assert_eq!(text.matches(PAGE_BREAK).count(), 4);
    assert!(text.contains("](<plots/"));
}

#[test]
fn headline_requires_framerate_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_units_log(dir.path());
    let dataset = Dataset::load(&path, &cpu_as_framerate()).unwrap();
    match stats::headline(&dataset) {
        Err(ReportError::MissingMetric(msg)) => assert!(msg.contains("Framerate")),
        other => panic!("expected missing framerate, got {other:?}"),
    }
}

#[test]
fn descriptor_log_full_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut hml = String::from(
        "00, 12-03-2024 10:00:00, Hardware monitoring log v1.6\n\
         01, 12-03-2024 10:00:00, Test GPU\n\
         02, dd-MM-yyyy hh:mm:ss, Framerate, GPU1 usage, CPU usage\n\
         03, Framerate, Framerate, FPS, 0.000, 200.000\n\
         03, GPU1 usage, GPU1 usage, %, 0.000, 100.000\n\
         03, CPU usage, CPU usage, %, 0.000, 100.000\n",
    );
    for i in 0..12 {
        hml.push_str(&format!(
            "80, 12-03-2024 10:00:{i:02}, {}, {}, {}\n",
            60 + i % 4,
            50 + i,
            20 + 2 * i
        ));
    }
    let path = dir.path().join("menu_gameplay.hml");
    std::fs::write(&path, hml).unwrap();

    let options = LoadOptions {
        layout: LogLayout::Descriptor,
        ..Default::default()
    };
    let dataset = Dataset::load(&path, &options).unwrap();
    let headline = stats::headline(&dataset).unwrap();
    assert_eq!((headline.min_framerate, headline.max_framerate), (60.0, 63.0));
    assert_eq!((headline.min_cpu_usage, headline.max_cpu_usage), (20.0, 42.0));

    let windows = PhaseWindows::from_bounds(4, 6, 12).unwrap();
    let allow: Vec<String> = dataset
        .metrics()
        .iter()
        .map(|m| m.identifier().to_string())
        .collect();
    let plots = dir.path().join("plots");
    std::fs::create_dir(&plots).unwrap();
    let mut report = MarkdownReport::new(dir.path());
    report.add_headline(&headline);
    let artifacts =
        pipeline::run(&dataset, &windows, &allow, &small_renderer(&plots), &mut report).unwrap();

    // Framerate: 3 singles. GPU and CPU: overlay + 3 singles each.
    assert_eq!(artifacts.len(), 11);

    let metrics = stats::summarize_selected(&dataset, &windows, &allow).unwrap();
    let summary = RunSummary::new(&path, &dataset, windows, headline, metrics, artifacts);
    let json_path = dir.path().join("summary.json");
    summary.save(&json_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["metrics"].as_array().unwrap().len(), 3);
    assert_eq!(value["artifacts"].as_array().unwrap().len(), 11);
}

#[test]
fn missing_input_file() {
    let err = Dataset::load(Path::new("/nonexistent/menu_gameplay.hml"), &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, ReportError::MissingInput(_)));
}

#[test]
fn missing_plot_dir_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_units_log(dir.path());
    let dataset = Dataset::load(&path, &cpu_as_framerate()).unwrap();
    let windows = PhaseWindows::from_bounds(3, 3, 10).unwrap();
    let mut report = MarkdownReport::new(dir.path());
    let err = pipeline::run(
        &dataset,
        &windows,
        &[CPU.to_string()],
        &small_renderer(&dir.path().join("plots")),
        &mut report,
    )
    .unwrap_err();
    assert!(matches!(err, ReportError::OutputDirMissing(_)));
}

#[test]
fn short_log_fails_before_any_chart() {
    let dir = tempfile::tempdir().unwrap();
    let mut text = String::from(",,FPS,%\n\nidx,time,Framerate,CPU usage\n");
    for i in 0..50 {
        text.push_str(&format!("{i},{i},60,{}\n", i % 100));
    }
    let path = dir.path().join("short.csv");
    std::fs::write(&path, text).unwrap();
    let dataset = Dataset::load(&path, &LoadOptions::default()).unwrap();

    let plots = dir.path().join("plots");
    std::fs::create_dir(&plots).unwrap();
    let windows = PhaseWindows::from_bounds(25, 100, 300).unwrap();
    let mut report = MarkdownReport::new(dir.path());
    let err = pipeline::run(
        &dataset,
        &windows,
        &[CPU.to_string()],
        &small_renderer(&plots),
        &mut report,
    )
    .unwrap_err();

    match err {
        ReportError::EmptyWindow {
            window,
            sample_count,
            ..
        } => {
            assert_eq!(window, windows.gameplay);
            assert_eq!(sample_count, 50);
        }
        other => panic!("expected empty window, got {other:?}"),
    }
    assert!(png_names(&plots).is_empty());
}
