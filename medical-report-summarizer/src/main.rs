use medical_report_summarizer::{SummarizerConfig, create_app, telemetry::init_tracing};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = SummarizerConfig::from_env()?;
    if config.openrouter_api_key.is_none() {
        warn!("OPENROUTER_API_KEY not set; only .txt reports can be processed");
    }

    let app = create_app(&config).await?;
    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    let addr = listener.local_addr()?;

    info!("Medical Report Summarizer starting on {}", addr);
    info!("Health check endpoint: http://{}/health", addr);
    info!("Analysis endpoint: POST http://{}/reports/analyze", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
