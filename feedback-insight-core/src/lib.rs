pub mod config;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod lexicon;
pub mod models;
pub mod sentiment;
pub mod summary;
pub mod tokenization;
pub mod topics;

pub use {
    engine::{AnalysisMode, AnalysisResult, EngineOutput, EngineSettings, FeedbackEngine},
    error::{FeedbackError, Result},
    lexicon::Vocabulary,
    models::{FeedbackBatch, FeedbackRecord},
};
