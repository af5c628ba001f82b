use {
    tracing::Level,
    tracing_subscriber::{prelude::*, filter::filter_fn},
    feedback_insight_core::config::LoggingConfig,
};

pub fn init_logging(config: &LoggingConfig) {
    let level = config.level();
    let filter = filter_fn(move |metadata| {
        // one line per skipped row is only wanted when tracing
        if metadata.target() == "feedback_insight_core::models" {
            level == Level::TRACE || metadata.level() <= &Level::INFO
        } else {
            true
        }
    });

    if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(level)
            .finish()
            .with(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .finish()
            .with(filter)
            .init();
    }
}
