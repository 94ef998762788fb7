//! Routes matched columns into the spec.
//!
//! Where a column goes depends on the spec it lands in. Until the spec has a
//! base (a geometry plus enough columns for it) matches fill the primary
//! columns. After that, columns only ever fill the grouping slot, and only on
//! a turn that carries a grouping cue such as "color by".

use crate::diagnostics::Diagnostic;
use crate::interpret::fuzzy::MatchReport;
use crate::spec::GraphSpec;
use crate::vocab::Vocabulary;

pub const MAX_PRIMARY_COLUMNS: usize = 2;

pub fn extract_columns(
    spec: &mut GraphSpec,
    report: &MatchReport,
    tokens: &[String],
    vocab: &Vocabulary,
) -> Vec<Diagnostic> {
    if spec.dataset().is_none() {
        return vec![Diagnostic::DatasetUnavailable];
    }

    let columns = report.columns();
    if columns.is_empty() {
        return Vec::new();
    }

    let mut diagnostics = Vec::new();
    if !spec.has_base() {
        let ignored: Vec<String> = columns.iter().skip(MAX_PRIMARY_COLUMNS).cloned().collect();
        spec.primary_columns = columns.into_iter().take(MAX_PRIMARY_COLUMNS).collect();
        if !ignored.is_empty() {
            diagnostics.push(Diagnostic::ColumnsIgnored { columns: ignored });
        }
        return diagnostics;
    }

    if vocab.cue_starts(tokens).is_empty() {
        diagnostics.push(Diagnostic::ColumnsIgnored { columns });
        return diagnostics;
    }

    let mut grouping = None;
    for column in columns {
        if spec.primary_columns.contains(&column) {
            diagnostics.push(Diagnostic::GroupingIsPrimary { column });
        } else {
            grouping = Some(column);
        }
    }
    if grouping.is_some() {
        spec.grouping_column = grouping;
    }
    diagnostics
}

/// Add every modifier named in the utterance. Returns whether any was named.
pub fn extract_modifiers(spec: &mut GraphSpec, tokens: &[String], vocab: &Vocabulary) -> bool {
    let mut found = false;
    for (modifier, words) in &vocab.modifier_words {
        if tokens.iter().any(|t| words.contains(t)) {
            spec.modifiers.insert(*modifier);
            found = true;
        }
    }
    found
}
