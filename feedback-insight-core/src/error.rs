use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("unknown analysis mode: \"{0}\" (expected one of: sentiment, keywords, topics, summary)")]
    InvalidMode(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid vocabulary: {0}")]
    Vocabulary(String),

    #[error("failed to parse config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
