mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::DrillCostApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Drilling Cost Optimization Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DrillCostApp::new(config)))),
    )
}
