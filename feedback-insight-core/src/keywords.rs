use {
    std::{collections::{HashMap, HashSet}, sync::Arc},
    serde::{Serialize, Deserialize},
    crate::{
        lexicon::StopWordFilter,
        models::FeedbackBatch,
        tokenization::TextNormalizer,
    },
};

pub const DEFAULT_TOP_N: usize = 20;
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;

/// How often a term is counted.
/// `Records` counts a term once per record mentioning it, `Occurrences` counts every token.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCounting {
    #[default]
    Records,
    Occurrences,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    normalizer: TextNormalizer,
    stop_words: Arc<StopWordFilter>,
    min_token_length: usize,
    counting: KeywordCounting,
}

struct TermCount {
    count: usize,
    first_seen: usize,
}

impl KeywordEntry {
    pub fn new(term: impl Into<String>, count: usize) -> Self {
        Self {
            term: term.into(),
            count,
        }
    }
}

impl KeywordExtractor {
    pub fn new(stop_words: Arc<StopWordFilter>, min_token_length: usize) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            stop_words,
            min_token_length,
            counting: KeywordCounting::default(),
        }
    }

    pub fn with_counting(self, counting: KeywordCounting) -> Self {
        Self {
            counting,
            ..self
        }
    }

    pub fn is_keyword(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_length && !self.stop_words.is_stop_word(token)
    }

    /// Every keyword of the batch, most frequent first. Equal counts keep the order in which
    /// the terms first appeared in the batch.
    pub fn frequencies(&self, batch: &FeedbackBatch) -> Vec<KeywordEntry> {
        let mut counts: HashMap<String, TermCount> = HashMap::new();

        for text in batch.texts() {
            let mut seen_in_record = HashSet::new();

            for token in self.normalizer.tokens(text).filter(|token| self.is_keyword(token)) {
                if self.counting == KeywordCounting::Records && !seen_in_record.insert(token.clone()) {
                    continue;
                }

                let first_seen = counts.len();
                counts.entry(token)
                    .or_insert(TermCount { count: 0, first_seen })
                    .count += 1;
            }
        }

        let mut table: Vec<(String, TermCount)> = counts.into_iter().collect();
        table.sort_by(|(_, a), (_, b)| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));

        table.into_iter()
            .map(|(term, term_count)| KeywordEntry::new(term, term_count.count))
            .collect()
    }

    pub fn extract(&self, batch: &FeedbackBatch, top_n: usize) -> Vec<KeywordEntry> {
        let mut keywords = self.frequencies(batch);
        keywords.truncate(top_n);
        keywords
    }
}
