mod app;
mod color;
mod state;
mod ui;

use app::TedAnalyzerApp;
use eframe::egui;
use state::AppState;
use ted_market_analyzer::config::Settings;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::load().unwrap_or_else(|e| {
        log::error!("Falling back to default settings: {e:#}");
        Settings::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "TED Market Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(TedAnalyzerApp::new(AppState::new(settings))))),
    )
}
