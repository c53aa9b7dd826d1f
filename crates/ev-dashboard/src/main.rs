mod bootstrap;
mod summary;

use anyhow::Result;
use ev_core::settings::Settings;
use ev_data::pipeline::load_and_summarize;
use ev_runtime::orchestrator::LoadOrchestrator;
use ev_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("EV Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Sample: {}",
        settings.view,
        settings.theme,
        settings.sample_size
    );

    let source = bootstrap::resolve_source(settings.source.as_deref());
    let loader = settings.loader_config();
    let insights = settings.insight_config();

    match settings.view.as_str() {
        "dashboard" => {
            tracing::info!("Loading {} in the background...", source);

            let app = App::new(&settings.theme, source.to_string(), settings.page_size);
            let (rx, handle) = LoadOrchestrator::new(source, loader, insights).start();

            // Raw mode delivers Ctrl+C as a key event; the loop exits on it
            // and on 'q' after restoring the terminal.
            let result = app.run(rx).await;
            handle.abort();
            result?;
        }

        "summary" => {
            let (dataset, insight_summary) = load_and_summarize(&source, &loader, &insights).await?;
            let label = source.to_string();

            if settings.format == "json" {
                let report = summary::render_json(&label, &dataset, &insight_summary);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", summary::render_text(&label, &dataset, &insight_summary));
            }
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
