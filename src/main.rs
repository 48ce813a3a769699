use anyhow::{anyhow, Result};
use eframe::egui;
use mcq_extractor::api::ApiClient;
use mcq_extractor::app::McqExtractorApp;
use mcq_extractor::config::Config;
use mcq_extractor::utils::logging;
use tracing::{info, warn};

fn main() -> Result<()> {
    logging::init();

    let (config, config_errors) = Config::load();
    if !config_errors.is_empty() {
        warn!("{} configuration setting(s) ignored", config_errors.len());
    }
    info!(
        "Backend {} (extract: {}, downloads in {})",
        config.base_url,
        config.extract_mode,
        config.download_dir.display()
    );
    let api = ApiClient::new(&config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 720.0])
            .with_min_inner_size([600.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "MCQ Extractor AI",
        options,
        Box::new(move |cc| Box::new(McqExtractorApp::new(cc, api, config_errors))),
    )
    .map_err(|e| anyhow!("Window closed with an error: {}", e))
}
