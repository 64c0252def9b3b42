mod app;
mod data;
mod engine;
mod gui;
mod log;

use std::path::PathBuf;

use app::ActivityChartApp;
use engine::config::ChartConfig;

/// Command line: `activity_chart [COMPOUND.json] [--config CONFIG.json]`
struct CliArgs {
    compound: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> CliArgs {
    let mut out = CliArgs {
        compound: None,
        config: None,
    };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => out.config = args.next().map(PathBuf::from),
            _ if out.compound.is_none() => out.compound = Some(PathBuf::from(arg)),
            _ => ::log::warn!("Ignoring extra argument: {}", arg),
        }
    }
    out
}

fn load_config(path: Option<&PathBuf>) -> ChartConfig {
    let Some(path) = path else {
        return ChartConfig::default();
    };
    ChartConfig::load(path).unwrap_or_else(|e| {
        ::log::error!("Could not read config {}: {}, using defaults", path.display(), e);
        ChartConfig::default()
    })
}

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    ::log::info!(
        "Starting Compound Activity Chart v{}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = parse_args(std::env::args().skip(1));
    let config = load_config(cli.config.as_ref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Compound Activity Chart")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Compound Activity Chart",
        options,
        Box::new(move |cc| Ok(Box::new(ActivityChartApp::new(cc, config, cli.compound)))),
    )
}
