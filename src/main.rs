mod app;
mod commands;
mod config;
mod engine;
mod event;
mod gemini;
mod logging;
mod project;
mod session;
mod theme;
mod ui;

use app::CodeWrapApp;
use config::Config;
use eframe::egui;
use gemini::GeminiClient;
use session::store::Store;
use session::Session;
use std::sync::mpsc;
use theme::Theme;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut warnings = Vec::new();
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "using default configuration");
            warnings.push(format!("config ignored: {err}"));
            let mut config = Config::default();
            config.apply_env(|name| std::env::var(name).ok());
            config
        }
    };
    if !config.has_api_key() {
        tracing::warn!("no API key configured; prompts will fail until GEMINI_API_KEY is set");
        warnings.push("no API key configured (set GEMINI_API_KEY)".to_string());
    }

    let store = Store::new(&config.data_dir);
    let project = store.load_project();
    let agents = store.load_agents();
    for warning in [&project.warning, &agents.warning].into_iter().flatten() {
        tracing::warn!(%warning, "persisted state discarded");
        warnings.push(warning.clone());
    }
    tracing::info!(
        files = project.value.len(),
        agents = agents.value.len(),
        data_dir = %store.dir().display(),
        "session state loaded"
    );

    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("codewrap-runtime")
        .build()?;

    let client = runtime.block_on(async { GeminiClient::new(config, tx) })?;
    let session = Session::new(project.value, agents.value);
    let app = CodeWrapApp::new(rx, client, session, store, project.restored, warnings);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CodeWrap",
        native_options,
        Box::new(move |creation_context| {
            Theme::default().apply_visuals(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
