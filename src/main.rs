mod app;
mod color;
mod config;
mod data;
mod state;
#[cfg(test)]
mod test_support;
mod ui;
mod worker;

use app::PcaViewerApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        log::error!("Invalid configuration, using defaults: {e}");
        AppConfig::default()
    });
    log::info!("Using PCA service at {}", config.api_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "XYZ PCA Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(PcaViewerApp::new(cc, config)))),
    )
}
