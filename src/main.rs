mod analysis;
mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod error;
mod state;
mod ui;

use std::path::Path;

use anyhow::Context;
use app::AttritionDashboardApp;
use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load(Path::new(CONFIG_FILE))?;
    let dataset = data::loader::load_file(&config.dataset_path, config.schema)
        .context("cannot start dashboard")?;
    let state = AppState::new(dataset, config.dataset_path.clone(), &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HR Attrition Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(AttritionDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
