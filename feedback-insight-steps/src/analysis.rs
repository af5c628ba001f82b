use {
    std::sync::Arc,
    anyhow::Result,
    tracing::info,
    feedback_insight_core::{AnalysisMode, EngineOutput, FeedbackBatch, FeedbackEngine},
};

pub async fn run_analysis_step(engine: Arc<FeedbackEngine>, batch: Arc<FeedbackBatch>, mode: AnalysisMode) -> Result<EngineOutput> {
    info!("running {} analysis on {} feedback records", mode, batch.len());

    let output = tokio::task::spawn_blocking(move || engine.run(&batch, mode)).await?;

    if output.skipped_records > 0 {
        info!("{} entries were skipped because they contain no text", output.skipped_records);
    }
    info!("{} analysis finished", mode);

    Ok(output)
}
