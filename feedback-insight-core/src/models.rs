use {
    serde::{Serialize, Deserialize},
    serde_json::Value,
    tracing::debug,
    crate::error::{FeedbackError, Result},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub index: usize,
    pub text: String,
}

/// Ordered, already-loaded feedback texts for one analysis run.
///
/// Entries that were not text (null cells, numbers in a JSON array) are not
/// kept as records; they are only counted, so callers can report how much of
/// the input was left out.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackBatch {
    records: Vec<FeedbackRecord>,
    skipped: usize,
}

impl FeedbackRecord {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

impl FeedbackBatch {
    pub fn from_texts<I, S>(texts: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> {
        Self::from_entries(texts.into_iter().map(|text| Some(text)))
    }

    pub fn from_entries<I, S>(entries: I) -> Self where I: IntoIterator<Item = Option<S>>, S: Into<String> {
        let mut records = Vec::new();
        let mut skipped = 0;

        for (index, entry) in entries.into_iter().enumerate() {
            match entry {
                Some(text) => records.push(FeedbackRecord::new(index, text)),
                None => {
                    debug!("skipping feedback entry {}: no text", index);
                    skipped += 1;
                },
            }
        }

        Self {
            records,
            skipped,
        }
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let entries = match value {
            Value::Array(entries) => entries,
            other => return Err(FeedbackError::InvalidInput(format!("expected an array of feedback texts, got {}", json_type_name(other)))),
        };

        Ok(Self::from_entries(entries.iter().map(|entry| match entry {
            Value::String(text) => Some(text.clone()),
            _ => None,
        })))
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|record| record.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Share of `count` in `total` on a 0-100 scale; an empty total is 0%.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64) / (total as f64) * 100.0
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
