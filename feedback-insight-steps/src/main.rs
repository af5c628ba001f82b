use {
    std::{env, path::PathBuf, sync::Arc},
    anyhow::{anyhow, Result},
    tracing::{info, warn},
    feedback_insight_core::{
        config::Config,
        AnalysisMode,
        FeedbackEngine,
    },
    crate::{
        analysis::run_analysis_step,
        data_loading::load_feedback_file,
        report::{export_report, render_report},
        utils::init_logging,
    },
};

mod analysis;
mod data_loading;
mod report;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::try_load();
    init_logging(&config.as_ref().map(|config| config.logging.clone()).unwrap_or_default());
    let config = config.unwrap_or_else(|err| {
        warn!("failed to read config, using defaults: {}", err);
        Config::default()
    });

    info!("feedback insight");

    let mut args = env::args().skip(1);
    let mode: AnalysisMode = args.next()
        .unwrap_or_else(|| AnalysisMode::Summary.to_string())
        .parse()?;
    let path = args.next()
        .or_else(|| config.input.path().cloned())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("no input file: pass one as the second argument or set [input].path in config.toml"))?;

    let engine = Arc::new(FeedbackEngine::from_config(&config)?);
    let batch = Arc::new(load_feedback_file(&path, config.input.column().map(|v| v.as_str()))?);

    let output = run_analysis_step(engine, batch, mode).await?;

    let counting = config.engine.settings().keyword_counting();
    match config.output.path() {
        Some(output_path) => export_report(&output, counting, &PathBuf::from(output_path))?,
        None => info!("\n{}", render_report(&output, counting)),
    }

    Ok(())
}
