use std::env;
use std::sync::Arc;

use anyhow::{Context as _, Result, anyhow};
use medical_report_summarizer::{
    MedicalReport, ReportComponents, SummarizerConfig, build_report_workflow,
    create_flow_runner, create_report_session, tasks::REPORT_KEY,
};
use report_flow::{InMemorySessionStorage, SessionStorage};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <report_file>", args[0]);
        eprintln!("Example: {} ./reports/discharge.txt", args[0]);
        std::process::exit(1);
    }
    let file_path = &args[1];

    let config = SummarizerConfig::from_env()?;
    let components = ReportComponents::from_config(&config)
        .await
        .context("Failed to initialise vector store")?;

    let graph = Arc::new(build_report_workflow(&config, &components));
    let storage: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let runner = create_flow_runner(graph.clone(), storage.clone());

    let session = create_report_session(&graph, file_path.clone()).await?;
    let session_id = session.id.clone();
    storage.save(session).await?;

    println!("Processing report: {file_path}");
    runner
        .run(&session_id)
        .await
        .with_context(|| format!("Failed to process {file_path}"))?;

    let report: MedicalReport = storage
        .get(&session_id)
        .await?
        .ok_or_else(|| anyhow!("Session {session_id} disappeared"))?
        .context
        .get(REPORT_KEY)
        .await
        .ok_or_else(|| anyhow!("Report missing from session {session_id}"))?;
    let summary = report
        .summary
        .ok_or_else(|| anyhow!("Workflow finished without a summary"))?;

    println!();
    println!("{}", summary.result.summary_text);
    println!();
    println!("Follow-up: {}", summary.result.follow_up_date);
    println!(
        "Detected conditions: {}",
        summary.result.detected_diseases.join(", ")
    );
    println!(
        "Chunks indexed: {}",
        report.chunk_count.unwrap_or_default()
    );
    println!("Processing time: {:.2}s", summary.processing_time_secs);

    Ok(())
}
