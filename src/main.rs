mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::anyhow;
use app::LaunchDashApp;
use clap::Parser;
use config::{Args, DashboardConfig};
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = DashboardConfig::from_args(&args)?;

    // A missing or malformed data file still opens the window with the error shown.
    let mut state = AppState::new(config.slider);
    match data::loader::load_file(&config.data_path) {
        Ok(table) => state.set_table(table, Some(config.data_path.clone())),
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", config.data_path.display());
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(LaunchDashApp::new(config, state)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
