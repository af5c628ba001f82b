use {
    std::{fmt, sync::Arc},
    serde::{Serialize, Deserialize},
    crate::{
        lexicon::{Polarity, SentimentLexicon},
        models::{percentage, FeedbackBatch},
        tokenization::TextNormalizer,
    },
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub positive_hits: usize,
    pub negative_hits: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecordSentiment {
    pub index: usize,
    #[serde(flatten)]
    pub result: SentimentResult,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SentimentBreakdown {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
    pub overall: SentimentLabel,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BatchSentiment {
    pub records: Vec<RecordSentiment>,
    pub breakdown: SentimentBreakdown,
}

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    normalizer: TextNormalizer,
    lexicon: Arc<SentimentLexicon>,
}

impl SentimentLabel {
    // order in which equal shares are resolved for the overall label
    pub const PRIORITY: [SentimentLabel; 3] = [SentimentLabel::Positive, SentimentLabel::Negative, SentimentLabel::Neutral];
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "POSITIVE"),
            Self::Negative => write!(f, "NEGATIVE"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

impl SentimentResult {
    pub fn from_hits(positive_hits: usize, negative_hits: usize) -> Self {
        let label = if positive_hits > negative_hits {
            SentimentLabel::Positive
        } else if negative_hits > positive_hits {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };

        Self {
            label,
            positive_hits,
            negative_hits,
        }
    }
}

impl SentimentBreakdown {
    pub fn from_counts(positive: usize, negative: usize, neutral: usize) -> Self {
        let total = positive + negative + neutral;

        Self {
            total,
            positive,
            negative,
            neutral,
            positive_percentage: percentage(positive, total),
            negative_percentage: percentage(negative, total),
            neutral_percentage: percentage(neutral, total),
            overall: overall_label(positive, negative, neutral),
        }
    }

    pub fn from_labels<'a, I>(labels: I) -> Self where I: IntoIterator<Item = &'a SentimentLabel> {
        let (mut positive, mut negative, mut neutral) = (0, 0, 0);
        for label in labels {
            match label {
                SentimentLabel::Positive => positive += 1,
                SentimentLabel::Negative => negative += 1,
                SentimentLabel::Neutral => neutral += 1,
            }
        }

        Self::from_counts(positive, negative, neutral)
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn percentage(&self, label: SentimentLabel) -> f64 {
        match label {
            SentimentLabel::Positive => self.positive_percentage,
            SentimentLabel::Negative => self.negative_percentage,
            SentimentLabel::Neutral => self.neutral_percentage,
        }
    }
}

// An empty batch has no evidence either way and is reported as neutral.
fn overall_label(positive: usize, negative: usize, neutral: usize) -> SentimentLabel {
    if positive + negative + neutral == 0 {
        return SentimentLabel::Neutral;
    }

    let count = |label: &SentimentLabel| match label {
        SentimentLabel::Positive => positive,
        SentimentLabel::Negative => negative,
        SentimentLabel::Neutral => neutral,
    };

    let mut overall = SentimentLabel::PRIORITY[0];
    for label in &SentimentLabel::PRIORITY[1..] {
        if count(label) > count(&overall) {
            overall = *label;
        }
    }

    overall
}

impl SentimentAnalyzer {
    pub fn new(lexicon: Arc<SentimentLexicon>) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            lexicon,
        }
    }

    pub fn classify(&self, text: &str) -> SentimentResult {
        let mut positive_hits = 0;
        let mut negative_hits = 0;

        for token in self.normalizer.tokens(text) {
            match self.lexicon.polarity(&token) {
                Some(Polarity::Positive) => positive_hits += 1,
                Some(Polarity::Negative) => negative_hits += 1,
                None => {},
            }
        }

        SentimentResult::from_hits(positive_hits, negative_hits)
    }

    pub fn classify_batch(&self, batch: &FeedbackBatch) -> BatchSentiment {
        let records: Vec<RecordSentiment> = batch.records()
            .iter()
            .map(|record| RecordSentiment {
                index: record.index,
                result: self.classify(&record.text),
            })
            .collect();

        let breakdown = SentimentBreakdown::from_labels(records.iter().map(|record| &record.result.label));

        BatchSentiment {
            records,
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::lexicon::Vocabulary,
        super::*,
    };

    fn analyzer() -> SentimentAnalyzer {
        SentimentAnalyzer::new(Vocabulary::shared().lexicon)
    }

    #[test]
    fn positive_text() {
        let result = analyzer().classify("Great product, excellent service!");

        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.positive_hits, 2);
        assert_eq!(result.negative_hits, 0);
    }

    #[test]
    fn negative_text() {
        let result = analyzer().classify("Terrible quality, broken on arrival");

        assert_eq!(result.label, SentimentLabel::Negative);
        assert_eq!(result.negative_hits, 2);
    }

    #[test]
    fn equal_hits_are_neutral() {
        let result = analyzer().classify("good but slow");

        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!((result.positive_hits, result.negative_hits), (1, 1));
    }

    #[test]
    fn empty_text_is_neutral_with_no_hits() {
        assert_eq!(analyzer().classify("   "), SentimentResult::from_hits(0, 0));
        assert_eq!(analyzer().classify("").label, SentimentLabel::Neutral);
    }

    #[test]
    fn whole_tokens_only() {
        // "goods" and "likely" contain lexicon words but are not lexicon words
        assert_eq!(analyzer().classify("goods likely").label, SentimentLabel::Neutral);
    }

    #[test]
    fn classify_is_pure() {
        let analyzer = analyzer();
        let text = "I love it, but delivery was awful and slow";

        assert_eq!(analyzer.classify(text), analyzer.classify(text));
    }

    #[test]
    fn breakdown_percentages_sum_to_hundred() {
        let batch = FeedbackBatch::from_texts(vec!["good", "bad", "meh", "great", "love it", "awful", "ok"]);
        let breakdown = analyzer().classify_batch(&batch).breakdown;

        let sum = breakdown.positive_percentage + breakdown.negative_percentage + breakdown.neutral_percentage;
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(breakdown.total, 7);
        assert_eq!(breakdown.overall, SentimentLabel::Positive);
    }

    #[test]
    fn overall_label_uses_priority_on_ties() {
        assert_eq!(SentimentBreakdown::from_counts(1, 1, 1).overall, SentimentLabel::Positive);
        assert_eq!(SentimentBreakdown::from_counts(0, 2, 2).overall, SentimentLabel::Negative);
        assert_eq!(SentimentBreakdown::from_counts(1, 0, 3).overall, SentimentLabel::Neutral);
        assert_eq!(SentimentBreakdown::from_counts(0, 1, 0).overall, SentimentLabel::Negative);
    }

    #[test]
    fn empty_batch_breakdown() {
        let sentiment = analyzer().classify_batch(&FeedbackBatch::default());

        assert!(sentiment.records.is_empty());
        assert_eq!(sentiment.breakdown.total, 0);
        assert_eq!(sentiment.breakdown.positive_percentage, 0.0);
        assert_eq!(sentiment.breakdown.negative_percentage, 0.0);
        assert_eq!(sentiment.breakdown.neutral_percentage, 0.0);
        assert_eq!(sentiment.breakdown.overall, SentimentLabel::Neutral);
    }

    #[test]
    fn per_record_results_keep_input_order() {
        let batch = FeedbackBatch::from_entries(vec![Some("bad"), None, Some("good")]);
        let sentiment = analyzer().classify_batch(&batch);

        let labels: Vec<(usize, SentimentLabel)> = sentiment.records.iter().map(|r| (r.index, r.result.label)).collect();
        assert_eq!(labels, vec![(0, SentimentLabel::Negative), (2, SentimentLabel::Positive)]);
    }
}
