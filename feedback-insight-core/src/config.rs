use {
    std::{fs::read_to_string, str::FromStr},
    tracing::{warn, Level},
    serde::Deserialize,
    crate::{
        engine::EngineSettings,
        error::{FeedbackError, Result},
        keywords::{KeywordCounting, DEFAULT_MIN_TOKEN_LENGTH, DEFAULT_TOP_N},
        lexicon::{
            SentimentLexicon,
            StopWordFilter,
            Vocabulary,
            DEFAULT_NEGATIVE_WORDS,
            DEFAULT_POSITIVE_WORDS,
            DEFAULT_STOP_WORDS,
        },
        summary::DEFAULT_SUMMARY_TOP_N,
        topics::TopicRules,
    },
};

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    pub vocabulary: Option<VocabularyConfig>,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EngineConfig {
    top_n: Option<usize>,
    summary_top_n: Option<usize>,
    min_token_length: Option<usize>,
    #[serde(default)]
    keyword_counting: KeywordCounting,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct VocabularyConfig {
    positive_words: Option<Vec<String>>,
    negative_words: Option<Vec<String>>,
    stop_words: Option<Vec<String>>,
    topics: Option<Vec<TopicConfig>>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TopicConfig {
    pub name: String,
    pub triggers: Vec<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct InputConfig {
    path: Option<String>,
    column: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct OutputConfig {
    path: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
    level: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: None,
            summary_top_n: None,
            min_token_length: None,
            keyword_counting: KeywordCounting::default(),
        }
    }
}

impl Config {
    pub fn try_load() -> std::result::Result<Self, String> {
        read_to_string("./config.toml")
            .or_else(|_| read_to_string("/config/config.toml"))
            .map_err(|err| err.to_string())
            .and_then(|v| Self::from_toml(&v).map_err(|err| err.to_string()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| FeedbackError::Config(err.to_string()))
    }

    pub fn vocabulary(&self) -> Result<Vocabulary> {
        match self.vocabulary.as_ref() {
            Some(vocabulary) => vocabulary.build(),
            None => Ok(Vocabulary::shared()),
        }
    }
}

impl EngineConfig {
    pub fn top_n(&self) -> usize {
        self.top_n.unwrap_or(DEFAULT_TOP_N)
    }

    pub fn summary_top_n(&self) -> usize {
        self.summary_top_n.unwrap_or(DEFAULT_SUMMARY_TOP_N)
    }

    pub fn min_token_length(&self) -> usize {
        self.min_token_length.unwrap_or(DEFAULT_MIN_TOKEN_LENGTH)
    }

    pub fn settings(&self) -> EngineSettings {
        EngineSettings::builder()
            .top_n(self.top_n())
            .summary_top_n(self.summary_top_n())
            .min_token_length(self.min_token_length())
            .keyword_counting(self.keyword_counting)
            .build()
    }
}

impl VocabularyConfig {
    pub fn build(&self) -> Result<Vocabulary> {
        if self.positive_words.is_none() && self.negative_words.is_none() && self.stop_words.is_none() && self.topics.is_none() {
            return Ok(Vocabulary::shared());
        }

        let lexicon = SentimentLexicon::new(
            words_or_default(&self.positive_words, DEFAULT_POSITIVE_WORDS),
            words_or_default(&self.negative_words, DEFAULT_NEGATIVE_WORDS),
        )?;
        let stop_words = StopWordFilter::new(words_or_default(&self.stop_words, DEFAULT_STOP_WORDS))?;
        let topics = match self.topics.as_ref() {
            Some(topics) => TopicRules::new(topics.iter().map(|topic| (topic.name.clone(), topic.triggers.clone())))?,
            None => TopicRules::default_rules(),
        };

        Ok(Vocabulary::new(lexicon, stop_words, topics))
    }
}

fn words_or_default(words: &Option<Vec<String>>, default: &[&str]) -> Vec<String> {
    words.as_ref()
        .cloned()
        .unwrap_or_else(|| default.iter().map(|v| v.to_string()).collect())
}

impl InputConfig {
    pub fn path(&self) -> Option<&String> {
        self.path.as_ref()
    }

    pub fn column(&self) -> Option<&String> {
        self.column.as_ref()
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Level {
        match self.level.as_ref().map(|v| Level::from_str(v)) {
            Some(Ok(level)) => level,
            Some(Err(err)) => {
                warn!("unknown log level {:?}, using info: {}", self.level, err);
                Level::INFO
            },
            None => Level::INFO,
        }
    }
}

impl OutputConfig {
    pub fn path(&self) -> Option<&String> {
        self.path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use {
        std::sync::Arc,
        crate::lexicon::Polarity,
        super::*,
    };

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.engine.top_n(), DEFAULT_TOP_N);
        assert_eq!(config.engine.summary_top_n(), DEFAULT_SUMMARY_TOP_N);
        assert_eq!(config.engine.min_token_length(), DEFAULT_MIN_TOKEN_LENGTH);
        assert!(config.input.path().is_none());
        assert!(config.output.path().is_none());
        assert!(!config.logging.json);
        assert_eq!(config.logging.level(), Level::INFO);
        assert!(Arc::ptr_eq(&config.vocabulary().unwrap().lexicon, &Vocabulary::shared().lexicon));
    }

    #[test]
    fn engine_and_io_sections() {
        let config = Config::from_toml(r#"
[engine]
top_n = 5
min_token_length = 2
keyword_counting = "occurrences"

[input]
path = "data/reviews.csv"
column = "Review Text"

[output]
path = "report.json"

[logging]
json = true
level = "debug"
"#).unwrap();

        let settings = config.engine.settings();
        assert_eq!(settings.top_n(), 5);
        assert_eq!(settings.summary_top_n(), DEFAULT_SUMMARY_TOP_N);
        assert_eq!(settings.min_token_length(), 2);
        assert_eq!(settings.keyword_counting(), KeywordCounting::Occurrences);
        assert_eq!(config.input.path().map(|v| v.as_str()), Some("data/reviews.csv"));
        assert_eq!(config.input.column().map(|v| v.as_str()), Some("Review Text"));
        assert_eq!(config.output.path().map(|v| v.as_str()), Some("report.json"));
        assert!(config.logging.json);
        assert_eq!(config.logging.level(), Level::DEBUG);
    }

    #[test]
    fn vocabulary_overrides() {
        let config = Config::from_toml(r#"
[vocabulary]
positive_words = ["superb"]

[[vocabulary.topics]]
name = "Battery"
triggers = ["battery", "charge"]
"#).unwrap();

        let vocabulary = config.vocabulary().unwrap();
        assert_eq!(vocabulary.lexicon.polarity("superb"), Some(Polarity::Positive));
        assert_eq!(vocabulary.lexicon.polarity("good"), None);
        assert_eq!(vocabulary.lexicon.polarity("terrible"), Some(Polarity::Negative));
        assert!(vocabulary.stop_words.is_stop_word("the"));
        assert_eq!(vocabulary.topics.names().collect::<Vec<_>>(), vec!["Battery"]);
    }

    #[test]
    fn overlapping_vocabulary_is_an_error() {
        let config = Config::from_toml(r#"
[vocabulary]
positive_words = ["cheap"]
negative_words = ["cheap"]
"#).unwrap();

        assert!(matches!(config.vocabulary(), Err(FeedbackError::Vocabulary(_))));
    }

    #[test]
    fn punctuated_vocabulary_words_are_normalized() {
        let config = Config::from_toml(r#"
[vocabulary]
positive_words = ["top-notch"]
stop_words = ["don't"]

[[vocabulary.topics]]
name = "Communication"
triggers = ["e-mail"]
"#).unwrap();

        let engine = crate::FeedbackEngine::new(config.vocabulary().unwrap(), config.engine.settings());
        let batch = crate::FeedbackBatch::from_texts(vec!["top-notch e-mail, don't"]);

        match engine.run(&batch, crate::AnalysisMode::Sentiment).result {
            crate::AnalysisResult::Sentiment(sentiment) => assert_eq!(sentiment.records[0].result.positive_hits, 1),
            other => panic!("unexpected result: {:?}", other),
        }
        match engine.run(&batch, crate::AnalysisMode::Topics).result {
            crate::AnalysisResult::Topics(topics) => assert!(topics.assignments[&0].contains("Communication")),
            other => panic!("unexpected result: {:?}", other),
        }
        match engine.run(&batch, crate::AnalysisMode::Keywords).result {
            crate::AnalysisResult::Keywords(keywords) => assert!(!keywords.iter().any(|entry| entry.term == "dont")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn multi_word_trigger_is_an_error() {
        let config = Config::from_toml(r#"
[[vocabulary.topics]]
name = "Delivery"
triggers = ["fast delivery"]
"#).unwrap();

        assert!(matches!(config.vocabulary(), Err(FeedbackError::Vocabulary(_))));
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(matches!(Config::from_toml("[engine]\ntop_n = \"many\""), Err(FeedbackError::Config(_))));
    }
}
