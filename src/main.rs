//! Dataset Visualizer - upload a CSV, pick a chart type and column roles, render the chart.

mod charts;
mod config;
mod data;
mod gui;
mod session;
mod stats;

use config::Config;
use eframe::egui;
use gui::VisualizerApp;

const WINDOW_TITLE: &str = "Dataset Visualizer";

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load();
    log::info!(
        "Starting {} ({}x{})",
        WINDOW_TITLE,
        config.window_width,
        config.window_height
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([900.0, 600.0])
            .with_title(WINDOW_TITLE)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(VisualizerApp::new(cc, config)))),
    )
}
