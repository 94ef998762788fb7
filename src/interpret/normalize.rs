//! Transcript -> token sequence.

use crate::Result;
use crate::vocab::Vocabulary;

use regex::Regex;
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

/// Words with inner apostrophes or dots stay whole ("let's", "x.1"); trailing
/// punctuation from the recognizer is dropped.
const TOKEN_RE: &str = r"[a-z0-9_]+(?:['.][a-z0-9_]+)*";

#[derive(Debug, Clone)]
pub struct Normalizer {
    token_re: Regex,
    stopwords: BTreeSet<String>,
}

impl Normalizer {
    pub fn new(vocab: &Vocabulary) -> Result<Self> {
        Ok(Self {
            token_re: Regex::new(TOKEN_RE)?,
            stopwords: vocab.stopwords.clone(),
        })
    }

    /// Fold to ASCII, lowercase, split into words and drop stopwords.
    pub fn normalize(&self, transcript: &str) -> Vec<String> {
        let folded = fold_ascii(transcript);
        self.token_re
            .find_iter(&folded)
            .map(|m| m.as_str())
            .filter(|t| !self.stopwords.contains(*t))
            .map(str::to_string)
            .collect()
    }
}

/// Compatibility-decompose, then keep only ASCII: "Café" -> "cafe".
pub fn fold_ascii(text: &str) -> String {
    text.nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_ascii_lowercase()
}
