use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use eframe::egui;

mod app;
mod backend;
mod clipboard;
mod config;
mod controller;
mod error;
mod localizations;
mod models;
mod progress;
mod theme;
mod ui;
mod view;

use app::ConvertApp;
use backend::HttpBackend;
use config::Args;
use localizations::Localizations;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = config::resolve(&args)?;

    let localizer = match config.language.as_deref() {
        Some(lang) => Localizations::for_language(lang),
        None => Localizations::new(),
    };
    log::info!(
        "Using server {} (language {})",
        config.server_url(),
        localizer.current_language()
    );

    let backend = Arc::new(HttpBackend::new(&config.server_url()));
    let app = ConvertApp::new(backend, localizer, config.download_dir());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 620.0])
            .with_min_inner_size([520.0, 480.0])
            .with_title("YouTube Converter"),
        ..Default::default()
    };

    eframe::run_native(
        "YouTube Converter",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run egui app: {}", e))
}
