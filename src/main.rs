mod api;
mod config;
mod images;
mod loader;
mod model;
mod pages;
mod ui;
mod widgets;

use config::Config;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::VeglyticsApp;

fn main() -> eframe::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("veglytics=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 950.0])
            .with_min_inner_size([1000.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Veglytics",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            ui::set_custom_style(&cc.egui_ctx);
            Ok(Box::new(VeglyticsApp::new(&config)?))
        }),
    )
}
