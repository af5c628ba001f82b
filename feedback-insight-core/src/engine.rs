use {
    std::{fmt, str::FromStr},
    serde::{Serialize, Deserialize},
    serde_json::Value,
    tracing::{debug, warn},
    typed_builder::TypedBuilder,
    crate::{
        config::Config,
        error::{FeedbackError, Result},
        keywords::{KeywordCounting, KeywordEntry, KeywordExtractor, DEFAULT_MIN_TOKEN_LENGTH, DEFAULT_TOP_N},
        lexicon::Vocabulary,
        models::FeedbackBatch,
        sentiment::{BatchSentiment, SentimentAnalyzer},
        summary::{SummaryGenerator, SummaryReport, DEFAULT_SUMMARY_TOP_N},
        topics::{TopicClassifier, TopicReport},
    },
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Sentiment,
    Keywords,
    Topics,
    Summary,
}

#[derive(TypedBuilder, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    #[builder(default = DEFAULT_TOP_N)]
    top_n: usize,
    #[builder(default = DEFAULT_SUMMARY_TOP_N)]
    summary_top_n: usize,
    #[builder(default = DEFAULT_MIN_TOKEN_LENGTH)]
    min_token_length: usize,
    #[builder(default)]
    keyword_counting: KeywordCounting,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisResult {
    Sentiment(BatchSentiment),
    Keywords(Vec<KeywordEntry>),
    Topics(TopicReport),
    Summary(SummaryReport),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub skipped_records: usize,
    pub result: AnalysisResult,
}

/// Runs one analysis over an in-memory batch.
///
/// The engine holds no per-run state: every `run` only reads the shared vocabulary, so one
/// engine can serve concurrent callers (e.g. behind an `Arc` on blocking worker threads).
#[derive(Debug, Clone)]
pub struct FeedbackEngine {
    settings: EngineSettings,
    sentiment: SentimentAnalyzer,
    keywords: KeywordExtractor,
    topics: TopicClassifier,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 4] = [AnalysisMode::Sentiment, AnalysisMode::Keywords, AnalysisMode::Topics, AnalysisMode::Summary];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::Keywords => "keywords",
            Self::Topics => "topics",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AnalysisMode {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        Self::ALL.iter()
            .find(|mode| mode.name() == name)
            .copied()
            .ok_or_else(|| FeedbackError::InvalidMode(s.to_owned()))
    }
}

impl EngineSettings {
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn summary_top_n(&self) -> usize {
        self.summary_top_n
    }

    pub fn min_token_length(&self) -> usize {
        self.min_token_length
    }

    pub fn keyword_counting(&self) -> KeywordCounting {
        self.keyword_counting
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AnalysisResult {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            Self::Sentiment(_) => AnalysisMode::Sentiment,
            Self::Keywords(_) => AnalysisMode::Keywords,
            Self::Topics(_) => AnalysisMode::Topics,
            Self::Summary(_) => AnalysisMode::Summary,
        }
    }
}

impl FeedbackEngine {
    pub fn new(vocabulary: Vocabulary, settings: EngineSettings) -> Self {
        Self {
            settings,
            sentiment: SentimentAnalyzer::new(vocabulary.lexicon),
            keywords: KeywordExtractor::new(vocabulary.stop_words, settings.min_token_length())
                .with_counting(settings.keyword_counting()),
            topics: TopicClassifier::new(vocabulary.topics),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.vocabulary()?, config.engine.settings()))
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn keywords(&self) -> &KeywordExtractor {
        &self.keywords
    }

    pub fn summary(&self) -> SummaryGenerator<'_> {
        SummaryGenerator::new(&self.sentiment, &self.keywords, &self.topics, self.settings.summary_top_n())
    }

    pub fn run(&self, batch: &FeedbackBatch, mode: AnalysisMode) -> EngineOutput {
        debug!("running {} analysis on {} records", mode, batch.len());
        if batch.skipped() > 0 {
            warn!("{} feedback entries were skipped because they contain no text", batch.skipped());
        }

        let result = match mode {
            AnalysisMode::Sentiment => AnalysisResult::Sentiment(self.sentiment.classify_batch(batch)),
            AnalysisMode::Keywords => AnalysisResult::Keywords(self.keywords.extract(batch, self.settings.top_n())),
            AnalysisMode::Topics => AnalysisResult::Topics(self.topics.classify_batch(batch)),
            AnalysisMode::Summary => AnalysisResult::Summary(self.summary().summarize(batch)),
        };

        EngineOutput {
            skipped_records: batch.skipped(),
            result,
        }
    }

    pub fn run_named(&self, batch: &FeedbackBatch, mode: &str) -> Result<EngineOutput> {
        Ok(self.run(batch, mode.parse()?))
    }

    /// Same as [`FeedbackEngine::run_named`] for a batch that still is raw JSON.
    pub fn run_json(&self, entries: &Value, mode: &str) -> Result<EngineOutput> {
        let mode: AnalysisMode = mode.parse()?;
        let batch = FeedbackBatch::from_json(entries)?;
        Ok(self.run(&batch, mode))
    }
}

impl Default for FeedbackEngine {
    fn default() -> Self {
        Self::new(Vocabulary::shared(), EngineSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use {
        std::{sync::Arc, thread},
        serde_json::json,
        crate::{
            lexicon::{SentimentLexicon, StopWordFilter},
            sentiment::SentimentLabel,
            topics::TopicRules,
        },
        super::*,
    };

    #[test]
    fn mode_names_parse() {
        assert_eq!("sentiment".parse::<AnalysisMode>().unwrap(), AnalysisMode::Sentiment);
        assert_eq!(" Keywords ".parse::<AnalysisMode>().unwrap(), AnalysisMode::Keywords);
        assert_eq!("TOPICS".parse::<AnalysisMode>().unwrap(), AnalysisMode::Topics);
        assert_eq!("summary".parse::<AnalysisMode>().unwrap(), AnalysisMode::Summary);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let engine = FeedbackEngine::default();
        let err = engine.run_named(&FeedbackBatch::default(), "emotions").unwrap_err();

        assert_eq!(err, FeedbackError::InvalidMode("emotions".to_owned()));
    }

    #[test]
    fn dispatches_to_matching_component() {
        let engine = FeedbackEngine::default();
        let batch = FeedbackBatch::from_texts(vec!["good support"]);

        for mode in AnalysisMode::ALL {
            assert_eq!(engine.run(&batch, mode).result.mode(), mode);
        }
    }

    #[test]
    fn empty_batch_is_well_defined_for_every_mode() {
        let engine = FeedbackEngine::default();
        let batch = FeedbackBatch::default();

        for mode in AnalysisMode::ALL {
            let output = engine.run(&batch, mode);
            assert_eq!(output.skipped_records, 0);

            match output.result {
                AnalysisResult::Sentiment(sentiment) => assert_eq!(sentiment.breakdown.total, 0),
                AnalysisResult::Keywords(keywords) => assert!(keywords.is_empty()),
                AnalysisResult::Topics(topics) => assert!(topics.assignments.is_empty()),
                AnalysisResult::Summary(summary) => assert_eq!(summary.record_count(), 0),
            }
        }
    }

    #[test]
    fn json_input() {
        let engine = FeedbackEngine::default();

        let output = engine.run_json(&json!(["great", null, 42, "awful service"]), "sentiment").unwrap();
        assert_eq!(output.skipped_records, 2);
        match output.result {
            AnalysisResult::Sentiment(sentiment) => {
                assert_eq!(sentiment.records.len(), 2);
                assert_eq!(sentiment.records[1].index, 3);
            },
            other => panic!("unexpected result: {:?}", other),
        }

        let err = engine.run_json(&json!("great"), "sentiment").unwrap_err();
        assert!(matches!(err, FeedbackError::InvalidInput(_)));
    }

    #[test]
    fn input_batch_is_not_modified() {
        let engine = FeedbackEngine::default();
        let batch = FeedbackBatch::from_entries(vec![Some("Great product!"), None, Some("Bad")]);
        let before = batch.clone();

        for mode in AnalysisMode::ALL {
            engine.run(&batch, mode);
        }

        assert_eq!(batch, before);
    }

    #[test]
    fn settings_are_applied() {
        let settings = EngineSettings::builder().top_n(2).build();
        let engine = FeedbackEngine::new(Vocabulary::shared(), settings);
        let batch = FeedbackBatch::from_texts(vec!["alpha beta gamma delta"]);

        match engine.run(&batch, AnalysisMode::Keywords).result {
            AnalysisResult::Keywords(keywords) => assert_eq!(keywords.len(), 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn occurrence_counting_setting() {
        let settings = EngineSettings::builder().keyword_counting(KeywordCounting::Occurrences).build();
        let engine = FeedbackEngine::new(Vocabulary::shared(), settings);
        let batch = FeedbackBatch::from_texts(vec!["good good good"; 100]);

        match engine.run(&batch, AnalysisMode::Keywords).result {
            AnalysisResult::Keywords(keywords) => assert_eq!(keywords, vec![KeywordEntry::new("good", 300)]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn substituted_vocabulary() {
        let vocabulary = Vocabulary::new(
            SentimentLexicon::new(["shiny"], ["dull"]).unwrap(),
            StopWordFilter::new(["shiny"]).unwrap(),
            TopicRules::new(vec![("Looks", vec!["shiny", "dull"])]).unwrap(),
        );
        let engine = FeedbackEngine::new(vocabulary, EngineSettings::default());
        let batch = FeedbackBatch::from_texts(vec!["shiny shiny thing", "great but dull"]);

        match engine.run(&batch, AnalysisMode::Sentiment).result {
            AnalysisResult::Sentiment(sentiment) => {
                assert_eq!(sentiment.records[0].result.label, SentimentLabel::Positive);
                assert_eq!(sentiment.records[1].result.label, SentimentLabel::Negative);
            },
            other => panic!("unexpected result: {:?}", other),
        }

        match engine.run(&batch, AnalysisMode::Keywords).result {
            AnalysisResult::Keywords(keywords) => assert_eq!(keywords[0], KeywordEntry::new("thing", 1)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn concurrent_runs_share_the_engine() {
        let engine = Arc::new(FeedbackEngine::default());
        let batch = Arc::new(FeedbackBatch::from_texts(vec!["good service", "bad app", "fast delivery"]));
        let expected = engine.run(&batch, AnalysisMode::Summary);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                let batch = batch.clone();
                thread::spawn(move || engine.run(&batch, AnalysisMode::Summary))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
