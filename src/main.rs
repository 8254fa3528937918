mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::RustyAtlasApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!(
        "Data sources: samples={} earthquakes={} plates={}",
        config.samples_url,
        config.earthquakes_url,
        config.plates_url
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Atlas – Biodiversity & Earthquakes",
        options,
        Box::new(|_cc| Ok(Box::new(RustyAtlasApp::new(config)))),
    )
}
