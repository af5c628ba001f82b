#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Splits on whitespace, lower-cases and keeps only alphanumeric characters of every word.
    /// Words that are left empty (pure punctuation) produce no token.
    pub fn tokens<'a>(&self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        text.split_whitespace()
            .map(normalize_word)
            .filter(|token| !token.is_empty())
    }

    pub fn token_count(&self, text: &str) -> usize {
        self.tokens(text).count()
    }
}

pub(crate) fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
