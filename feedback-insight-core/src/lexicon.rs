use {
    std::{collections::HashSet, sync::Arc},
    once_cell::sync::Lazy,
    crate::{
        error::{FeedbackError, Result},
        tokenization::normalize_word,
        topics::TopicRules,
    },
};

pub const DEFAULT_POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic",
    "outstanding", "perfect", "love", "like", "enjoy", "satisfied",
    "happy", "pleased", "impressed", "recommend", "best", "awesome",
];

pub const DEFAULT_NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "disappointed", "frustrated",
    "angry", "upset", "hate", "dislike", "poor", "worst", "useless",
    "broken", "defective", "slow", "expensive", "difficult", "confusing",
];

pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "can",
    "this", "that", "these", "those",
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
];

static DEFAULT_VOCABULARY: Lazy<Vocabulary> = Lazy::new(|| Vocabulary {
    lexicon: Arc::new(SentimentLexicon::default_words()),
    stop_words: Arc::new(StopWordFilter::default_words()),
    topics: Arc::new(TopicRules::default_rules()),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct StopWordFilter {
    words: HashSet<String>,
}

/// Read-only word tables shared by every analyzer of an engine.
/// Cloning only bumps reference counts.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub lexicon: Arc<SentimentLexicon>,
    pub stop_words: Arc<StopWordFilter>,
    pub topics: Arc<TopicRules>,
}

impl SentimentLexicon {
    pub fn new<P, N, S>(positive: P, negative: N) -> Result<Self>
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let positive = normalized_set(positive)?;
        let negative = normalized_set(negative)?;

        let mut overlap: Vec<&String> = positive.intersection(&negative).collect();
        if !overlap.is_empty() {
            overlap.sort();
            return Err(FeedbackError::Vocabulary(format!("words listed as both positive and negative: {:?}", overlap)));
        }

        Ok(Self {
            positive,
            negative,
        })
    }

    fn default_words() -> Self {
        Self {
            positive: default_set(DEFAULT_POSITIVE_WORDS),
            negative: default_set(DEFAULT_NEGATIVE_WORDS),
        }
    }

    pub fn polarity(&self, token: &str) -> Option<Polarity> {
        if self.positive.contains(token) {
            Some(Polarity::Positive)
        } else if self.negative.contains(token) {
            Some(Polarity::Negative)
        } else {
            None
        }
    }
}

impl StopWordFilter {
    pub fn new<I, S>(words: I) -> Result<Self> where I: IntoIterator<Item = S>, S: AsRef<str> {
        Ok(Self {
            words: normalized_set(words)?,
        })
    }

    fn default_words() -> Self {
        Self {
            words: default_set(DEFAULT_STOP_WORDS),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.words.contains(token)
    }
}

impl Vocabulary {
    pub fn new(lexicon: SentimentLexicon, stop_words: StopWordFilter, topics: TopicRules) -> Self {
        Self {
            lexicon: Arc::new(lexicon),
            stop_words: Arc::new(stop_words),
            topics: Arc::new(topics),
        }
    }

    /// The built-in tables, initialized once per process.
    pub fn shared() -> Self {
        DEFAULT_VOCABULARY.clone()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::shared()
    }
}

/// Normalizes configured words exactly like text tokens, so "E-mail" matches the token "email".
/// Entries spanning several words or holding no alphanumeric character can never match a token
/// and are rejected.
pub(crate) fn normalized_set<I, S>(words: I) -> Result<HashSet<String>> where I: IntoIterator<Item = S>, S: AsRef<str> {
    words.into_iter()
        .map(|word| {
            let word = word.as_ref().trim();
            if word.split_whitespace().nth(1).is_some() {
                return Err(FeedbackError::Vocabulary(format!("\"{}\" is more than one word", word)));
            }

            let normalized = normalize_word(word);
            if normalized.is_empty() {
                return Err(FeedbackError::Vocabulary(format!("\"{}\" has no letters or digits", word)));
            }

            Ok(normalized)
        })
        .collect()
}

fn default_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|word| normalize_word(word)).collect()
}
