//! Versioned keyword vocabulary.
//!
//! The words a speaker uses to steer the interpreter (quit, reset, chart
//! names, "color by", ...) are the interface between a person and the
//! program, so they live in one serde value with a version number instead of
//! being scattered through the code. `ggspeak vocab` prints the built-in
//! table; `--vocab file.json` replaces it.

use crate::Result;
use crate::diagnostics;
use crate::spec::{Geometry, Modifier};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

pub const VOCABULARY_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub version: u32,

    pub quit_words: BTreeSet<String>,
    pub save_words: BTreeSet<String>,
    pub reset_words: BTreeSet<String>,
    pub summary_words: BTreeSet<String>,

    /// Filler removed by the normalizer before anything else looks at tokens.
    #[serde(default)]
    pub stopwords: BTreeSet<String>,

    /// Explicit chart keywords. Iteration order is keyword priority.
    #[serde(default)]
    pub geometry_words: BTreeMap<Geometry, BTreeSet<String>>,

    #[serde(default)]
    pub modifier_words: BTreeMap<Modifier, BTreeSet<String>>,

    /// Two-word phrases that route matched columns to the grouping slot.
    #[serde(default)]
    pub grouping_cues: Vec<[String; 2]>,
}

fn words(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        let geometry_words = BTreeMap::from([
            (Geometry::Histogram, words(&["histogram", "histograms", "hist"])),
            (
                Geometry::Bar,
                words(&["bar", "bars", "barplot", "barchart"]),
            ),
            (Geometry::Density, words(&["density"])),
            (Geometry::Line, words(&["line", "lines"])),
            (
                Geometry::Point,
                words(&["point", "points", "scatter", "scatterplot"]),
            ),
        ]);
        let modifier_words = BTreeMap::from([(
            Modifier::Smooth,
            words(&["smooth", "smoothed", "smoother", "trend"]),
        )]);
        let grouping_cues = ["group", "color", "colour", "colored", "split", "facet"]
            .iter()
            .map(|w| [w.to_string(), "by".to_string()])
            .collect();

        Self {
            version: VOCABULARY_VERSION,
            quit_words: words(&[
                "quit", "stop", "done", "finish", "finished", "end", "enough", "exit", "goodbye",
            ]),
            save_words: words(&["save"]),
            reset_words: words(&["reset", "restart", "clear"]),
            summary_words: words(&["summary", "summarize", "summarise", "status"]),
            stopwords: words(&[
                "a", "an", "the", "of", "me", "my", "i", "to", "and", "for", "give", "show", "make",
                "plot", "graph", "chart", "versus", "vs", "against", "please", "can", "you", "it",
                "with", "um", "uh", "now", "let's", "lets", "add", "use", "want", "some", "in",
                "on", "is", "this", "that",
            ]),
            geometry_words,
            modifier_words,
            grouping_cues,
        }
    }
}

impl Vocabulary {
    /// Read and validate a vocabulary file.
    pub fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| diagnostics::error_message(format!("read vocabulary file {}", path)))?;
        let vocab: Vocabulary = serde_json::from_str(&text).with_context(|| {
            diagnostics::error_message(format!("parse vocabulary file {}", path))
        })?;
        vocab.validated()
    }

    /// Lowercase every entry and check the sets do not step on each other.
    pub fn validated(self) -> Result<Self> {
        if self.version != VOCABULARY_VERSION {
            bail!(
                "{}",
                diagnostics::error_message(format!(
                    "unsupported vocabulary version {} (expected {})",
                    self.version, VOCABULARY_VERSION
                ))
            );
        }

        let mut geometry_words = BTreeMap::new();
        for (geometry, list) in self.geometry_words {
            geometry_words.insert(geometry, lowercase(geometry.name(), list)?);
        }
        let mut modifier_words = BTreeMap::new();
        for (modifier, list) in self.modifier_words {
            modifier_words.insert(modifier, lowercase("modifier_words", list)?);
        }
        let mut grouping_cues = Vec::with_capacity(self.grouping_cues.len());
        for [a, b] in self.grouping_cues {
            let cue = [a.trim().to_lowercase(), b.trim().to_lowercase()];
            if cue
                .iter()
                .any(|w| w.is_empty() || w.contains(char::is_whitespace))
            {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "grouping cue {:?} must be exactly two words",
                        cue
                    ))
                );
            }
            grouping_cues.push(cue);
        }

        let vocab = Self {
            version: self.version,
            quit_words: lowercase("quit_words", self.quit_words)?,
            save_words: lowercase("save_words", self.save_words)?,
            reset_words: lowercase("reset_words", self.reset_words)?,
            summary_words: lowercase("summary_words", self.summary_words)?,
            stopwords: lowercase("stopwords", self.stopwords)?,
            geometry_words,
            modifier_words,
            grouping_cues,
        };

        // Intent sets are disjoint so the classifier's priority never matters
        // for a single word.
        let intents = [
            ("quit_words", &vocab.quit_words),
            ("save_words", &vocab.save_words),
            ("reset_words", &vocab.reset_words),
            ("summary_words", &vocab.summary_words),
        ];
        for (i, (a_name, a)) in intents.iter().enumerate() {
            for (b_name, b) in &intents[i + 1..] {
                if let Some(w) = a.intersection(b).next() {
                    bail!(
                        "{}",
                        diagnostics::error_message(format!(
                            "'{}' appears in both {} and {}",
                            w, a_name, b_name
                        ))
                    );
                }
            }
            if let Some(w) = a.intersection(&vocab.stopwords).next() {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "'{}' appears in both {} and stopwords",
                        w, a_name
                    ))
                );
            }
        }

        for cue in &vocab.grouping_cues {
            if let Some(w) = cue.iter().find(|w| vocab.stopwords.contains(*w)) {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "grouping cue word '{}' is also a stopword",
                        w
                    ))
                );
            }
        }

        Ok(vocab)
    }

    /// Start index of every grouping cue bigram in `tokens`.
    pub fn cue_starts(&self, tokens: &[String]) -> Vec<usize> {
        tokens
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| {
                self.grouping_cues
                    .iter()
                    .any(|[a, b]| pair[0] == *a && pair[1] == *b)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Words with a meaning of their own; these never fuzzy-match a column.
    pub fn is_keyword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
            || self.quit_words.contains(token)
            || self.save_words.contains(token)
            || self.reset_words.contains(token)
            || self.summary_words.contains(token)
            || self.geometry_words.values().any(|w| w.contains(token))
            || self.modifier_words.values().any(|w| w.contains(token))
            || self
                .grouping_cues
                .iter()
                .any(|[a, b]| a == token || b == token)
    }
}

fn lowercase(field: &str, set: BTreeSet<String>) -> Result<BTreeSet<String>> {
    let mut out = BTreeSet::new();
    for w in set {
        let w = w.trim().to_lowercase();
        if w.is_empty() {
            bail!(
                "{}",
                diagnostics::error_message(format!("{} contains an empty word", field))
            );
        }
        out.insert(w);
    }
    Ok(out)
}
