mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::ArmObsApp;
use clap::Parser;
use config::Settings;
use eframe::egui;
use state::AppState;

#[derive(Parser)]
#[command(
    name = "armobs-viewer",
    version,
    about = "Disk usage of observation files by type, cycle and period"
)]
struct Cli {
    /// Observation table to open (.csv, .json or .parquet)
    table: Option<PathBuf>,

    /// JSON file with the initial filter values
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut state = AppState::new(settings);
    if let Some(path) = &cli.table {
        let table = data::loader::load_file(path)
            .with_context(|| format!("loading observation table {}", path.display()))?;
        state.set_table(table);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ArmObs – Observation Storage",
        options,
        Box::new(move |_cc| Ok(Box::new(ArmObsApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
