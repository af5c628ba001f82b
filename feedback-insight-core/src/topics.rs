use {
    std::{collections::{BTreeMap, BTreeSet, HashSet}, sync::Arc},
    serde::{Serialize, Deserialize},
    crate::{
        error::{FeedbackError, Result},
        lexicon::normalized_set,
        models::{percentage, FeedbackBatch},
        tokenization::{normalize_word, TextNormalizer},
    },
};

pub const DEFAULT_TOPICS: &[(&str, &[&str])] = &[
    ("Customer Service", &["service", "support", "staff", "help"]),
    ("Product Quality", &["quality", "defect", "broken", "durable"]),
    ("Price/Value", &["price", "expensive", "cheap", "value"]),
    ("Delivery/Shipping", &["delivery", "shipping", "late", "fast"]),
    ("Website/App", &["website", "app", "login", "crash"]),
    ("Communication", &["email", "response", "contact", "reply"]),
];

pub type TopicAssignment = BTreeMap<usize, BTreeSet<String>>;

#[derive(Debug, Clone)]
pub struct TopicRule {
    name: String,
    triggers: HashSet<String>,
}

/// Ordered topic table. The order is the one in which topics are reported when their
/// frequencies are equal.
#[derive(Debug, Clone)]
pub struct TopicRules {
    rules: Vec<TopicRule>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TopicFrequency {
    pub topic: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TopicReport {
    pub assignments: TopicAssignment,
    pub frequencies: Vec<TopicFrequency>,
}

#[derive(Debug, Clone)]
pub struct TopicClassifier {
    normalizer: TextNormalizer,
    rules: Arc<TopicRules>,
}

impl TopicRule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_triggered_by(&self, token: &str) -> bool {
        self.triggers.contains(token)
    }
}

impl TopicRules {
    pub fn new<I, N, T, S>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for (name, triggers) in rules {
            let name: String = name.into();
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(FeedbackError::Vocabulary("topic name must not be empty".to_owned()));
            }
            if !seen.insert(name.clone()) {
                return Err(FeedbackError::Vocabulary(format!("topic \"{}\" is defined more than once", name)));
            }

            result.push(TopicRule {
                name,
                triggers: normalized_set(triggers)?,
            });
        }

        Ok(Self {
            rules: result,
        })
    }

    pub(crate) fn default_rules() -> Self {
        Self {
            rules: DEFAULT_TOPICS.iter()
                .map(|(name, triggers)| TopicRule {
                    name: name.to_string(),
                    triggers: triggers.iter().map(|trigger| normalize_word(trigger)).collect(),
                })
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicRule> + '_ {
        self.rules.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }
}

impl TopicClassifier {
    pub fn new(rules: Arc<TopicRules>) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            rules,
        }
    }

    pub fn classify(&self, text: &str) -> BTreeSet<String> {
        let tokens: HashSet<String> = self.normalizer.tokens(text).collect();

        self.rules.iter()
            .filter(|rule| tokens.iter().any(|token| rule.is_triggered_by(token)))
            .map(|rule| rule.name().to_owned())
            .collect()
    }

    pub fn classify_batch(&self, batch: &FeedbackBatch) -> TopicReport {
        let assignments: TopicAssignment = batch.records()
            .iter()
            .map(|record| (record.index, self.classify(&record.text)))
            .collect();

        let frequencies = self.frequencies(&assignments, batch.len());

        TopicReport {
            assignments,
            frequencies,
        }
    }

    fn frequencies(&self, assignments: &TopicAssignment, total: usize) -> Vec<TopicFrequency> {
        let mut frequencies: Vec<TopicFrequency> = self.rules.names()
            .map(|topic| {
                let count = assignments.values().filter(|topics| topics.contains(topic)).count();
                TopicFrequency {
                    topic: topic.to_owned(),
                    count,
                    percentage: percentage(count, total),
                }
            })
            .collect();

        // stable, so equal counts stay in table order
        frequencies.sort_by(|a, b| b.count.cmp(&a.count));
        frequencies
    }
}

impl TopicReport {
    pub fn frequency(&self, topic: &str) -> Option<&TopicFrequency> {
        self.frequencies.iter().find(|frequency| frequency.topic == topic)
    }
}
