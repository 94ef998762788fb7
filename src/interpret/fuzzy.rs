//! Token -> column alignment that tolerates small transcription errors.
//!
//! Each token is tried, in order, as:
//! 1. an exact column name (case-insensitive),
//! 2. a known mis-hearing from the dataset's homophone table,
//! 3. a near miss: Levenshtein distance <= [`MAX_EDIT_DISTANCE`] to exactly one
//!    column. Equally close columns are reported, never guessed between.
//!
//! Vocabulary keywords and the words of a grouping cue are skipped, so "by"
//! never turns into a column called "y".

use crate::dataset::Dataset;
use crate::diagnostics::Diagnostic;
use crate::vocab::Vocabulary;

use std::collections::BTreeSet;

pub const MAX_EDIT_DISTANCE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Alias,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMatch {
    pub token: String,
    pub column: String,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    /// Unique (token, column) pairs in order of first occurrence.
    pub matches: Vec<ColumnMatch>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MatchReport {
    /// Matched columns in token order, without repeats.
    pub fn columns(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.matches
            .iter()
            .filter(|m| seen.insert(m.column.as_str()))
            .map(|m| m.column.clone())
            .collect()
    }
}

pub fn match_columns(tokens: &[String], dataset: &Dataset, vocab: &Vocabulary) -> MatchReport {
    let mut report = MatchReport::default();
    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();

    let mut cue_positions = BTreeSet::new();
    for start in vocab.cue_starts(tokens) {
        cue_positions.insert(start);
        cue_positions.insert(start + 1);
    }

    for (pos, token) in tokens.iter().enumerate() {
        if cue_positions.contains(&pos) {
            continue;
        }
        let Some((column, kind)) = resolve_token(token, dataset, vocab, &mut report.diagnostics)
        else {
            continue;
        };

        if kind != MatchKind::Exact {
            report.diagnostics.push(Diagnostic::Corrected {
                token: token.clone(),
                column: column.clone(),
            });
        }
        if seen.insert((token.clone(), column.clone())) {
            report.matches.push(ColumnMatch {
                token: token.clone(),
                column,
                kind,
            });
        }
    }

    log::debug!(
        "column matches: {:?}",
        report
            .matches
            .iter()
            .map(|m| (m.token.as_str(), m.column.as_str()))
            .collect::<Vec<_>>()
    );
    report
}

fn resolve_token(
    token: &str,
    dataset: &Dataset,
    vocab: &Vocabulary,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<(String, MatchKind)> {
    if let Some(name) = dataset
        .column_names()
        .find(|name| name.eq_ignore_ascii_case(token))
    {
        return Some((name.to_string(), MatchKind::Exact));
    }

    if let Some(column) = dataset.aliases().get(token) {
        return Some((column.clone(), MatchKind::Alias));
    }

    if vocab.is_keyword(token) || token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut best = usize::MAX;
    let mut candidates: Vec<&str> = Vec::new();
    for name in dataset.column_names() {
        let d = levenshtein(token, &name.to_lowercase());
        if d < best {
            best = d;
            candidates.clear();
        }
        if d == best {
            candidates.push(name);
        }
    }

    if best > MAX_EDIT_DISTANCE {
        diagnostics.push(Diagnostic::NoMatch {
            token: token.to_string(),
        });
        return None;
    }

    match candidates.as_slice() {
        [only] => Some((only.to_string(), MatchKind::Fuzzy)),
        _ => {
            diagnostics.push(Diagnostic::Ambiguous {
                token: token.to_string(),
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            });
            None
        }
    }
}

/// Classic Levenshtein distance over chars (insert, delete, substitute).
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;
    use crate::dataset::{Column, ColumnKind};
    use pretty_assertions::assert_eq;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn pairs(report: &MatchReport) -> Vec<(&str, &str, MatchKind)> {
        report
            .matches
            .iter()
            .map(|m| (m.token.as_str(), m.column.as_str(), m.kind))
            .collect()
    }

    #[test]
    fn levenshtein_distances() {
        assert_eq!(levenshtein("carat", "carat"), 0);
        assert_eq!(levenshtein("karat", "carat"), 1);
        assert_eq!(levenshtein("prize", "price"), 1);
        assert_eq!(levenshtein("prizes", "price"), 2);
        assert_eq!(levenshtein("deep", "depth"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn exact_alias_and_fuzzy_in_token_order() {
        let ds = fixtures::diamonds();
        let report = match_columns(
            &tokens(&["prise", "carrot", "depth"]),
            &ds,
            &Vocabulary::default(),
        );
        assert_eq!(
            pairs(&report),
            vec![
                ("prise", "price", MatchKind::Fuzzy),
                ("carrot", "carat", MatchKind::Alias),
                ("depth", "depth", MatchKind::Exact),
            ]
        );
        assert_eq!(report.columns(), vec!["price", "carat", "depth"]);
        assert!(report.diagnostics.iter().all(Diagnostic::is_informational));
    }

    #[test]
    fn distance_two_is_not_a_match() {
        let ds = fixtures::diamonds();
        let report = match_columns(&tokens(&["prizes"]), &ds, &Vocabulary::default());
        assert!(report.matches.is_empty());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::NoMatch {
                token: "prizes".to_string()
            }]
        );
    }

    #[test]
    fn ties_are_reported_not_guessed() {
        let ds = Dataset::new(
            "t",
            vec![
                Column {
                    name: "cost".to_string(),
                    kind: ColumnKind::Numeric,
                    values: vec![],
                },
                Column {
                    name: "coat".to_string(),
                    kind: ColumnKind::Categorical,
                    values: vec![],
                },
            ],
        );
        let report = match_columns(&tokens(&["cot"]), &ds, &Vocabulary::default());
        assert!(report.matches.is_empty());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::Ambiguous {
                token: "cot".to_string(),
                candidates: vec!["cost".to_string(), "coat".to_string()],
            }]
        );
    }

    #[test]
    fn keywords_and_cues_never_match() {
        let ds = fixtures::diamonds();
        // "by" is one edit from "y"; "color" is itself a column.
        let report = match_columns(
            &tokens(&["scatter", "color", "by", "clarity", "2"]),
            &ds,
            &Vocabulary::default(),
        );
        assert_eq!(report.columns(), vec!["clarity"]);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn repeated_pairs_collapse() {
        let ds = fixtures::diamonds();
        let report = match_columns(
            &tokens(&["price", "karat", "price", "carat"]),
            &ds,
            &Vocabulary::default(),
        );
        assert_eq!(
            pairs(&report),
            vec![
                ("price", "price", MatchKind::Exact),
                ("karat", "carat", MatchKind::Alias),
                ("carat", "carat", MatchKind::Exact),
            ]
        );
        assert_eq!(report.columns(), vec!["price", "carat"]);
    }
}
