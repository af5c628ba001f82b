use {
    histogram::Histogram,
    serde::{Serialize, Deserialize},
    tracing::warn,
    typed_builder::TypedBuilder,
    crate::{
        keywords::{KeywordEntry, KeywordExtractor},
        models::FeedbackBatch,
        sentiment::{SentimentAnalyzer, SentimentBreakdown},
        tokenization::TextNormalizer,
        topics::{TopicClassifier, TopicFrequency},
    },
};

pub const DEFAULT_SUMMARY_TOP_N: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LengthStats {
    pub mean_chars: f64,
    pub median_chars: u64,
    pub max_chars: u64,
}

#[derive(TypedBuilder, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SummaryReport {
    record_count: usize,
    #[builder(default)]
    skipped_records: usize,
    mean_tokens_per_record: f64,
    #[builder(default)]
    length: LengthStats,
    top_keywords: Vec<KeywordEntry>,
    topic_frequencies: Vec<TopicFrequency>,
    sentiment: SentimentBreakdown,
}

pub struct SummaryGenerator<'a> {
    normalizer: TextNormalizer,
    sentiment: &'a SentimentAnalyzer,
    keywords: &'a KeywordExtractor,
    topics: &'a TopicClassifier,
    top_n: usize,
}

impl SummaryReport {
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }

    pub fn mean_tokens_per_record(&self) -> f64 {
        self.mean_tokens_per_record
    }

    pub fn length(&self) -> &LengthStats {
        &self.length
    }

    pub fn top_keywords(&self) -> &[KeywordEntry] {
        &self.top_keywords
    }

    pub fn topic_frequencies(&self) -> &[TopicFrequency] {
        &self.topic_frequencies
    }

    pub fn sentiment(&self) -> &SentimentBreakdown {
        &self.sentiment
    }
}

impl<'a> SummaryGenerator<'a> {
    pub fn new(sentiment: &'a SentimentAnalyzer, keywords: &'a KeywordExtractor, topics: &'a TopicClassifier, top_n: usize) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            sentiment,
            keywords,
            topics,
            top_n,
        }
    }

    pub fn summarize(&self, batch: &FeedbackBatch) -> SummaryReport {
        let total_tokens: usize = batch.texts().map(|text| self.normalizer.token_count(text)).sum();
        let mean_tokens_per_record = if batch.is_empty() {
            0.0
        } else {
            (total_tokens as f64) / (batch.len() as f64)
        };

        SummaryReport::builder()
            .record_count(batch.len())
            .skipped_records(batch.skipped())
            .mean_tokens_per_record(mean_tokens_per_record)
            .length(length_stats(batch))
            .top_keywords(self.keywords.extract(batch, self.top_n))
            .topic_frequencies(self.topics.classify_batch(batch).frequencies)
            .sentiment(self.sentiment.classify_batch(batch).breakdown)
            .build()
    }
}

fn length_stats(batch: &FeedbackBatch) -> LengthStats {
    if batch.is_empty() {
        return LengthStats::default();
    }

    let mut histogram = Histogram::new();
    let mut total_chars = 0u64;
    let mut max_chars = 0u64;

    for text in batch.texts() {
        let chars = text.chars().count() as u64;
        total_chars += chars;
        max_chars = max_chars.max(chars);

        if let Err(err) = histogram.increment(chars) {
            warn!("failed to record feedback length {}: {}", chars, err);
        }
    }

    LengthStats {
        mean_chars: (total_chars as f64) / (batch.len() as f64),
        median_chars: histogram.percentile(50.0).unwrap_or(0),
        max_chars,
    }
}
